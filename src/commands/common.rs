//! Shared setup and formatting helpers for command handlers.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::analytics::{ComparisonEngine, DataQuality, DataSources, StatsEngine};
use crate::api::http::fail_fast_client;
use crate::api::ApiClient;
use crate::config::EngineConfig;
use crate::core::CacheLayer;
use crate::storage::FootballDatabase;
use crate::{LeagueCode, Result};

/// Everything a command needs: config, store and the two engines sharing
/// one cache.
pub struct CommandContext {
    pub config: EngineConfig,
    pub stats: StatsEngine<ApiClient>,
    pub comparison: ComparisonEngine<ApiClient>,
    store: Arc<FootballDatabase>,
}

impl CommandContext {
    /// Open the store, seeding it on first use, and build the engines.
    pub fn new(config: EngineConfig, fail_fast: bool) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(FootballDatabase::open(&config.database_path)?);
        if store.seed_sample_data()? {
            info!(path = %config.database_path.display(), "initialized empty database with sample data");
        }

        let client = if fail_fast {
            fail_fast_client(&config.api)?
        } else {
            ApiClient::new(&config.api)?
        };

        let sources = Arc::new(DataSources::new(
            Arc::clone(&store),
            client,
            Arc::new(CacheLayer::new()),
            config.ttl,
        ));

        Ok(Self {
            stats: StatsEngine::new(Arc::clone(&sources)),
            comparison: ComparisonEngine::new(sources),
            store,
            config,
        })
    }

    pub fn store(&self) -> &FootballDatabase {
        &self.store
    }

    /// League from the command line, else the configured one.
    pub fn league(&self, requested: Option<LeagueCode>) -> LeagueCode {
        requested.unwrap_or_else(|| self.config.league.clone())
    }
}

/// Pretty-print a value as JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Warning line shown above non-fresh results.
pub fn quality_notice(quality: DataQuality) -> Option<&'static str> {
    match quality {
        DataQuality::Fresh => None,
        DataQuality::Stale => Some("⚠ Live data unavailable; showing cached results past their refresh time."),
        DataQuality::Degraded => Some("⚠ Live data unavailable; showing figures from the local database."),
    }
}

/// Render a ratio as a percentage with one decimal.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Render a signed goal difference with an explicit plus sign.
pub fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}
