//! Command implementations for the football analytics CLI

pub mod common;
pub mod compare;
pub mod league;
pub mod seed;
pub mod teams;

#[cfg(test)]
mod tests;

use std::time::Duration;

use crate::cli::EngineArgs;
use crate::config::EngineConfig;

/// Apply command-line overrides on top of the environment configuration.
pub fn apply_engine_args(mut config: EngineConfig, args: &EngineArgs) -> EngineConfig {
    if let Some(path) = &args.db {
        config = config.with_database_path(path.clone());
    }
    if let Some(url) = &args.api_url {
        config.api = config.api.with_base_url(url.clone());
    }
    if let Some(secs) = args.ttl {
        config = config.with_ttl(Duration::from_secs(secs));
    }
    config
}
