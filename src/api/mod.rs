//! Live data from the external football API.
//!
//! [`LiveFeed`] is the seam between the engine and the network: production
//! code uses [`ApiClient`], tests substitute an in-memory feed.

pub mod http;
pub mod types;

use std::future::Future;

use crate::error::Result;
use crate::LeagueCode;

pub use http::ApiClient;
pub use types::{LiveMatch, ScorerIdentity, StandingEntry, TeamRef, TopScorer};

/// Source of live standings, fixtures, results and scorer lists.
///
/// Implementations retry transient failures themselves and report a final
/// failure as [`crate::FootballError::ApiUnavailable`].
pub trait LiveFeed: Send + Sync {
    /// League table in rank order.
    fn get_standings(
        &self,
        league: &LeagueCode,
    ) -> impl Future<Output = Result<Vec<StandingEntry>>> + Send;

    /// Upcoming matches, earliest kickoff first.
    fn get_fixtures(
        &self,
        league: &LeagueCode,
    ) -> impl Future<Output = Result<Vec<LiveMatch>>> + Send;

    /// Finished matches, most recent first.
    fn get_results(
        &self,
        league: &LeagueCode,
    ) -> impl Future<Output = Result<Vec<LiveMatch>>> + Send;

    /// Scorers as ranked by the API.
    fn get_top_scorers(
        &self,
        league: &LeagueCode,
    ) -> impl Future<Output = Result<Vec<TopScorer>>> + Send;
}
