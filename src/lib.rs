//! Football Analytics Library
//!
//! A data aggregation and caching engine for football statistics. It
//! reconciles a local SQLite store of season records with live data from the
//! football-data API, memoizes every read under a time-to-live policy, and
//! derives metrics for charts and reports.
//!
//! ## Features
//!
//! - **Season Store**: Teams, players and matches per season in SQLite
//! - **Live Feed**: Standings, fixtures, results and scorers with retry and backoff
//! - **Query Cache**: TTL memoization with single-flight refresh and stale fallback
//! - **Metrics**: Per-player efficiency, per-team rates, form and dashboards
//! - **Comparison**: Multi-team vectors normalized onto a 0..1 scale
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use football_analytics::{
//!     analytics::{DataSources, StatsEngine},
//!     api::ApiClient,
//!     config::EngineConfig,
//!     core::CacheLayer,
//!     storage::FootballDatabase,
//!     Season, TeamId,
//! };
//!
//! # async fn example() -> football_analytics::Result<()> {
//! let config = EngineConfig::default();
//! let store = Arc::new(FootballDatabase::open(&config.database_path)?);
//! let sources = Arc::new(DataSources::new(
//!     store,
//!     ApiClient::new(&config.api)?,
//!     Arc::new(CacheLayer::new()),
//!     config.ttl,
//! ));
//!
//! let stats = StatsEngine::new(sources);
//! let metrics = stats.team_metrics(TeamId::new(1), Season::new(2024)).await?;
//! println!("win rate: {:.2}", metrics.win_rate);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! The binary reads its settings from the environment (or a `.env` file):
//! ```bash
//! export FOOTBALL_API_KEY=your-token
//! export DATABASE_PATH=/var/lib/football/football.db
//! export CACHE_TTL=3600
//! ```

pub mod analytics;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{LeagueCode, PlayerId, Position, Season, TeamId};
pub use error::{FootballError, Result};
