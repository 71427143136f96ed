//! Derived metrics over cached store and live data.
//!
//! - `sources`: cached reads from the store and the live feed
//! - `stats`: per-player and per-team metrics, standings, scorers, dashboard
//! - `comparison`: multi-team vectors normalized onto a 0..1 scale

pub mod comparison;
pub mod sources;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{CacheStatus, Cached};

pub use comparison::{Axis, Comparison, ComparisonEngine, MetricVector, NormalizedVector};
pub use sources::DataSources;
pub use stats::{
    compute_player_metrics, compute_team_metrics, Dashboard, PlayerMetrics, StatsEngine,
    TeamForm, TeamMetrics,
};

/// How trustworthy a result is.
///
/// Variants are ordered from most to least trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    /// Within TTL, or just fetched.
    Fresh,
    /// Served from an expired cache entry because the live API was down.
    Stale,
    /// Live API down with nothing cached; rebuilt from local records.
    Degraded,
}

impl DataQuality {
    pub fn from_status(status: CacheStatus) -> Self {
        match status {
            CacheStatus::Hit | CacheStatus::Miss => DataQuality::Fresh,
            CacheStatus::Stale => DataQuality::Stale,
        }
    }

    /// The less trustworthy of two markers.
    pub fn worst(self, other: DataQuality) -> DataQuality {
        std::cmp::max(self, other)
    }

    pub fn is_fresh(&self) -> bool {
        *self == DataQuality::Fresh
    }
}

/// A result together with where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sourced<T> {
    pub data: T,
    pub quality: DataQuality,
    /// When the underlying data was fetched; `None` for local fallbacks.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> Sourced<T> {
    pub fn from_cached<U>(cached: &Cached<U>, data: T) -> Self {
        Self {
            data,
            quality: DataQuality::from_status(cached.status()),
            fetched_at: Some(cached.cached_at()),
        }
    }

    pub fn degraded(data: T) -> Self {
        Self {
            data,
            quality: DataQuality::Degraded,
            fetched_at: None,
        }
    }
}
