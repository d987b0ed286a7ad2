//! Bucket read/write operations for cached assets.
//!
//! Writes happen only during install; fetch handling is read-only.

use super::connection::AssetBucket;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// One stored asset response.
///
/// `key` is the request-identity hash (see [`super::hash::request_key`]);
/// `path` is the asset-list entry the response was installed under, kept
/// for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAsset {
    pub key: String,
    pub path: String,
    pub url: String,
    pub content_type: Option<String>,
    pub status_code: u16,
    pub body: Vec<u8>,
    pub stored_at: String,
}

impl AssetBucket {
    /// Insert or update a cached asset.
    ///
    /// Uses UPSERT semantics keyed on (bucket, key): re-installing the same
    /// asset list replaces entries in place, so installs are idempotent
    /// with respect to final bucket contents.
    pub async fn put(&self, asset: &CachedAsset) -> Result<(), Error> {
        let bucket = self.name.clone();
        let asset = asset.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO assets (
                        bucket, key, path, url, content_type, status_code, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(bucket, key) DO UPDATE SET
                        path = excluded.path,
                        url = excluded.url,
                        content_type = excluded.content_type,
                        status_code = excluded.status_code,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        &bucket,
                        &asset.key,
                        &asset.path,
                        &asset.url,
                        &asset.content_type,
                        asset.status_code as i64,
                        &asset.body,
                        &asset.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an asset by request-identity key.
    ///
    /// Returns None if the key doesn't exist in this bucket. Entries in
    /// other buckets are invisible, which is what makes version bumps an
    /// effective invalidation.
    pub async fn match_key(&self, key: &str) -> Result<Option<CachedAsset>, Error> {
        let bucket = self.name.clone();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CachedAsset>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, path, url, content_type, status_code, body, stored_at
                     FROM assets WHERE bucket = ?1 AND key = ?2",
                )?;

                let result = stmt.query_row(params![bucket, key], |row| {
                    Ok(CachedAsset {
                        key: row.get(0)?,
                        path: row.get(1)?,
                        url: row.get(2)?,
                        content_type: row.get(3)?,
                        status_code: row.get::<_, i64>(4)? as u16,
                        body: row.get(5)?,
                        stored_at: row.get(6)?,
                    })
                });

                match result {
                    Ok(a) => Ok(Some(a)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Number of assets stored in this bucket.
    pub async fn count(&self) -> Result<u64, Error> {
        let bucket = self.name.clone();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM assets WHERE bucket = ?1",
                    params![bucket],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
