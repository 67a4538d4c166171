//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for persisting the last fetched
//! user list. A single snapshot is stored as JSON and is considered fresh
//! for 60 minutes after capture.

pub mod manager;

pub use manager::{CacheManager, Snapshot, FRESHNESS_WINDOW_MS};
