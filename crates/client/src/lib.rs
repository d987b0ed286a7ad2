//! Client code for precache.
//!
//! This crate provides the HTTP fetch pipeline and the asset cache
//! controller that pre-caches a fixed asset list and serves cache-first
//! with network fallback.

pub mod controller;
pub mod fetch;

pub use controller::{CacheController, ServedResponse, ServedSource};

pub use fetch::{AssetRequest, FetchClient, FetchConfig, FetchResponse, Fetcher};
