//! Asset cache controller: install-time pre-caching, cache-first serving.
//!
//! The controller owns one bucket (named by the cache identifier) and one
//! fetcher, and exposes the two lifecycle operations:
//!
//! - [`CacheController::on_install`] resolves and fetches every asset in
//!   the configured list, then stores the responses. All-or-nothing: one
//!   failed asset fails the whole install, and nothing is written until
//!   every fetch has succeeded. The caller decides whether to retry.
//! - [`CacheController::on_fetch`] answers an intercepted request from the
//!   bucket when it can, and performs the request itself when it can't.
//!   It never writes to the bucket.
//!
//! Lifecycle state (uninstalled, installing, installed) belongs to the
//! caller: awaiting `on_install` to completion is the "held pending"
//! mechanism, and the controller keeps no state machine of its own.

use bytes::Bytes;
use reqwest::{StatusCode, Url};

use precache_core::cache::request_key;
use precache_core::{AppConfig, AssetBucket, CacheDb, CachedAsset, Error};

use crate::fetch::{AssetRequest, FetchClient, FetchConfig, FetchResponse, Fetcher, resolve};

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedSource {
    Cache,
    Network,
}

/// A response handed back to the requester, from cache or network.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub source: ServedSource,
}

impl ServedResponse {
    fn from_cache(asset: CachedAsset) -> Self {
        Self {
            status: StatusCode::from_u16(asset.status_code).unwrap_or(StatusCode::OK),
            content_type: asset.content_type,
            body: Bytes::from(asset.body),
            source: ServedSource::Cache,
        }
    }

    fn from_network(response: FetchResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type,
            body: response.bytes,
            source: ServedSource::Network,
        }
    }
}

/// Asset cache controller.
///
/// Generic over [`Fetcher`] so tests can drive it with a stub network;
/// production code uses [`FetchClient`].
pub struct CacheController<F = FetchClient> {
    bucket: AssetBucket,
    fetcher: F,
    origin: Url,
    assets: Vec<String>,
}

impl CacheController<FetchClient> {
    /// Build a controller from configuration: opens the database, binds
    /// the bucket named by the cache identifier, and constructs the HTTP
    /// client. Requires `origin` to be set.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let origin = crate::fetch::canonicalize(
            config.require_origin().map_err(|e| Error::InvalidUrl(e.to_string()))?,
        )
        .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let db = CacheDb::open(&config.db_path).await?;
        let bucket = db.bucket(config.cache_name());

        let fetcher = FetchClient::new(FetchConfig {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..FetchConfig::default()
        })?;

        Ok(Self::new(bucket, fetcher, origin, config.assets.clone()))
    }
}

impl<F: Fetcher> CacheController<F> {
    pub fn new(bucket: AssetBucket, fetcher: F, origin: Url, assets: Vec<String>) -> Self {
        Self { bucket, fetcher, origin, assets }
    }

    /// Handle the install signal: fetch and store every asset in the list.
    ///
    /// Assets are fetched sequentially in list order. A network failure or
    /// a non-success status on any asset aborts the install before anything
    /// is written. Returns only once every asset is stored; awaiting this
    /// is what holds the install pending.
    ///
    /// Re-installing the same list is idempotent: entries are keyed by
    /// request identity, so they are replaced, not duplicated.
    pub async fn on_install(&self) -> Result<(), Error> {
        let mut staged = Vec::with_capacity(self.assets.len());

        for path in &self.assets {
            let url = resolve(&self.origin, path).map_err(|e| Error::InstallFailed(format!("{path}: {e}")))?;
            let request = AssetRequest::get(url);

            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed(format!("{path}: {e}")))?;

            if !response.status.is_success() {
                return Err(Error::InstallFailed(format!(
                    "{path}: status {}",
                    response.status.as_u16()
                )));
            }

            tracing::debug!(path = %path, url = %request.url, bytes = response.bytes.len(), "staged asset");
            staged.push((path.clone(), request, response));
        }

        let stored_at = chrono::Utc::now().to_rfc3339();
        for (path, request, response) in staged {
            let asset = CachedAsset {
                key: request_key(request.method.as_str(), request.url.as_str()),
                path,
                url: request.url.to_string(),
                content_type: response.content_type,
                status_code: response.status.as_u16(),
                body: response.bytes.to_vec(),
                stored_at: stored_at.clone(),
            };
            self.bucket.put(&asset).await?;
        }

        tracing::info!(
            bucket = self.bucket.name(),
            assets = self.assets.len(),
            "install complete"
        );

        Ok(())
    }

    /// Handle the fetch signal: serve from the bucket, fall back to network.
    ///
    /// A cached match is returned immediately with no network access. On a
    /// miss the original request is performed once and its result, success
    /// or failure, is returned unmodified. Never writes to the bucket.
    pub async fn on_fetch(&self, request: &AssetRequest) -> Result<ServedResponse, Error> {
        let mut url = request.url.clone();
        url.set_fragment(None);
        let key = request_key(request.method.as_str(), url.as_str());

        // A failed lookup is treated the same as a miss: fall through.
        if let Ok(Some(hit)) = self.bucket.match_key(&key).await {
            tracing::debug!(url = %request.url, "cache hit");
            return Ok(ServedResponse::from_cache(hit));
        }

        tracing::debug!(url = %request.url, "cache miss");
        let response = self.fetcher.fetch(request).await?;
        Ok(ServedResponse::from_network(response))
    }

    /// The asset list this controller installs, in order.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }
}
