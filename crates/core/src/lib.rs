//! Core types and shared functionality for precache.
//!
//! This crate provides:
//! - Persistent asset bucket with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{AssetBucket, CacheDb, CachedAsset};
pub use config::AppConfig;
pub use error::Error;
