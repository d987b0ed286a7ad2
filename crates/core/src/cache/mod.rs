//! SQLite-backed storage for pre-cached assets.
//!
//! This module provides persistent, named asset buckets using SQLite with
//! async access via tokio-rusqlite. It supports:
//!
//! - Request-identity keys using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Any number of buckets in one database; stale buckets are simply
//!   abandoned when the cache identifier changes
//!
//! A bucket is the analogue of a named browser cache: opening one that does
//! not exist yet is free, entries are keyed, and writes are upserts.

pub mod assets;
pub mod connection;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use assets::CachedAsset;
pub use connection::{AssetBucket, CacheDb};
pub use hash::request_key;
