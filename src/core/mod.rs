//! Core utilities shared by the data sources
//!
//! - `cache`: TTL query cache with stale fallback and single-flight lookups
//! - `clock`: injectable time source for the cache
//! - `http`: request header construction for the football API

pub mod cache;
pub mod clock;
pub mod http;

pub use cache::{CacheKey, CacheLayer, CacheStats, CacheStatus, Cached, QueryKey};
pub use clock::{Clock, ManualClock, SystemClock};
pub use http::api_header_map;
