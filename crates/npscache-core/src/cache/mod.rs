//! Local caching module for offline data access.
//!
//! This module provides the `CacheStore`: one flat JSON document holding the
//! state index, every visited state's sites, and any nearby places attached
//! to those sites. The document is read once at startup and written once at
//! exit. Entries are only added or enriched during a run, never removed.

pub mod store;

pub use store::{CacheEntry, CacheError, CacheKey, CacheStore, LoadStatus};
