//! Engine configuration.
//!
//! Everything the engine needs is carried by [`EngineConfig`] and handed to
//! the constructors explicitly. Only the binary calls [`EngineConfig::from_env`];
//! library code never looks at the process environment.

use std::path::PathBuf;
use std::time::Duration;

use dirs::data_dir;

use crate::error::{FootballError, Result};
use crate::LeagueCode;

pub const CACHE_TTL_ENV_VAR: &str = "CACHE_TTL";
pub const FIXTURES_CACHE_TTL_ENV_VAR: &str = "FIXTURES_CACHE_TTL";
pub const DATABASE_PATH_ENV_VAR: &str = "DATABASE_PATH";
pub const API_URL_ENV_VAR: &str = "FOOTBALL_API_URL";
pub const API_KEY_ENV_VAR: &str = "FOOTBALL_API_KEY";
pub const API_MAX_RETRIES_ENV_VAR: &str = "API_MAX_RETRIES";
pub const API_TIMEOUT_ENV_VAR: &str = "API_TIMEOUT_SECS";
pub const LEAGUE_ENV_VAR: &str = "FOOTBALL_LEAGUE";

pub const DEFAULT_API_URL: &str = "https://api.football-data.org/v4";

/// Retry behaviour for live API calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before retry number `retry` (0-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(retry as i32);
        let millis = self.initial_backoff.as_millis() as f64 * factor;
        let capped = millis.min(self.max_backoff.as_millis() as f64);
        Duration::from_millis(capped.max(0.0) as u64)
    }
}

/// Connection settings for the external football API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Time-to-live settings per data family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheTtls {
    /// Stored records, standings and scorers.
    pub default: Duration,
    /// Fixtures and results, which move faster.
    pub fixtures: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(3600),
            fixtures: Duration::from_secs(1800),
        }
    }
}

/// Complete configuration of the engine and its data sources.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    pub league: LeagueCode,
    pub ttl: CacheTtls,
    pub api: ApiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            league: LeagueCode::default(),
            ttl: CacheTtls::default(),
            api: ApiConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl.default = ttl;
        self
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults for
    /// missing keys and rejecting malformed values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64, _>(&lookup, CACHE_TTL_ENV_VAR)? {
            config.ttl.default = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, FIXTURES_CACHE_TTL_ENV_VAR)? {
            config.ttl.fixtures = Duration::from_secs(secs);
        }
        if let Some(path) = non_empty(&lookup, DATABASE_PATH_ENV_VAR) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(url) = non_empty(&lookup, API_URL_ENV_VAR) {
            config.api.base_url = url;
        }
        config.api.api_key = non_empty(&lookup, API_KEY_ENV_VAR);
        if let Some(retries) = parse_var::<u32, _>(&lookup, API_MAX_RETRIES_ENV_VAR)? {
            config.api.retry.max_retries = retries;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, API_TIMEOUT_ENV_VAR)? {
            config.api.timeout = Duration::from_secs(secs);
        }
        if let Some(league) = non_empty(&lookup, LEAGUE_ENV_VAR) {
            config.league = league.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ttl.default.is_zero() {
            return Err(FootballError::Config {
                message: format!("{CACHE_TTL_ENV_VAR} must be greater than 0"),
            });
        }
        if self.api.timeout.is_zero() {
            return Err(FootballError::Config {
                message: format!("{API_TIMEOUT_ENV_VAR} must be greater than 0"),
            });
        }
        if self.api.retry.backoff_multiplier < 1.0 {
            return Err(FootballError::Config {
                message: "backoff multiplier must be at least 1.0".to_string(),
            });
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(FootballError::Config {
                message: format!("{API_URL_ENV_VAR} must be an http(s) URL"),
            });
        }
        Ok(())
    }
}

/// Default: <data dir>/football-analytics/football.db
pub fn default_database_path() -> PathBuf {
    let base = data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("football-analytics").join("football.db")
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| FootballError::Config {
            message: format!("{key} has an invalid value: {raw:?}"),
        }),
        None => Ok(None),
    }
}
