//! In-memory live feed and fixtures shared by the analytics tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};

use super::sources::DataSources;
use crate::api::{LiveFeed, LiveMatch, ScorerIdentity, StandingEntry, TeamRef, TopScorer};
use crate::config::CacheTtls;
use crate::core::{CacheLayer, ManualClock};
use crate::error::{FootballError, Result};
use crate::storage::FootballDatabase;
use crate::{LeagueCode, Position, Season};

#[derive(Default)]
pub(crate) struct FakeFeed {
    standings: Mutex<Vec<StandingEntry>>,
    scorers: Mutex<Vec<TopScorer>>,
    fixtures: Mutex<Vec<LiveMatch>>,
    down: AtomicBool,
    calls: AtomicUsize,
}

impl FakeFeed {
    pub(crate) fn with_standings(self, entries: Vec<StandingEntry>) -> Self {
        *self.standings.lock().unwrap() = entries;
        self
    }

    pub(crate) fn with_scorers(self, scorers: Vec<TopScorer>) -> Self {
        *self.scorers.lock().unwrap() = scorers;
        self
    }

    pub(crate) fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T: Clone>(&self, endpoint: &str, data: &Mutex<Vec<T>>) -> Result<Vec<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(FootballError::ApiUnavailable {
                endpoint: endpoint.to_string(),
                attempts: 4,
                reason: "connection refused".to_string(),
            });
        }
        Ok(data.lock().unwrap().clone())
    }
}

impl LiveFeed for FakeFeed {
    async fn get_standings(&self, _league: &LeagueCode) -> Result<Vec<StandingEntry>> {
        self.respond("standings", &self.standings)
    }

    async fn get_fixtures(&self, _league: &LeagueCode) -> Result<Vec<LiveMatch>> {
        self.respond("fixtures", &self.fixtures)
    }

    async fn get_results(&self, _league: &LeagueCode) -> Result<Vec<LiveMatch>> {
        self.respond("results", &self.fixtures)
    }

    async fn get_top_scorers(&self, _league: &LeagueCode) -> Result<Vec<TopScorer>> {
        self.respond("scorers", &self.scorers)
    }
}

pub(crate) fn season() -> Season {
    Season::new(2024)
}

pub(crate) fn league() -> LeagueCode {
    LeagueCode::new("PD")
}

pub(crate) const TTL: Duration = Duration::from_secs(3600);

pub(crate) fn team_ref(id: u32, name: &str) -> TeamRef {
    TeamRef {
        id,
        name: name.to_string(),
        short_name: None,
        tla: None,
    }
}

pub(crate) fn standing(rank: u32, external_id: u32, name: &str, points: u32) -> StandingEntry {
    StandingEntry {
        rank,
        team: team_ref(external_id, name),
        points,
        goal_difference: 0,
        played: 28,
        won: 0,
        draw: 0,
        lost: 0,
        goals_for: 0,
        goals_against: 0,
        team_id: None,
    }
}

pub(crate) fn scorer(name: &str, goals: u32) -> TopScorer {
    TopScorer {
        player: ScorerIdentity {
            id: 1,
            name: name.to_string(),
            nationality: "France".to_string(),
            position: Some(Position::Forward),
        },
        team: team_ref(86, "Real Madrid CF"),
        goals,
        assists: 0,
        played_matches: 26,
    }
}

/// Seeded store, the given feed and a cache on a manual clock.
pub(crate) fn sources_with(feed: FakeFeed) -> (Arc<DataSources<FakeFeed>>, Arc<ManualClock>) {
    let store = FootballDatabase::new_in_memory().unwrap();
    store.seed_sample_data().unwrap();

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
    ));
    let cache = Arc::new(CacheLayer::with_clock(clock.clone()));
    let ttl = CacheTtls {
        default: TTL,
        fixtures: TTL / 2,
    };

    (
        Arc::new(DataSources::new(Arc::new(store), feed, cache, ttl)),
        clock,
    )
}
