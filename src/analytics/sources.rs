//! Cached access to the store and the live feed.
//!
//! Every read the engines perform goes through here so that each one is
//! memoized under a [`QueryKey`] with the TTL of its data family.

use std::sync::Arc;

use crate::api::{LiveFeed, LiveMatch, StandingEntry, TopScorer};
use crate::config::CacheTtls;
use crate::core::{CacheLayer, Cached, QueryKey};
use crate::error::Result;
use crate::storage::{
    FootballDatabase, LeagueSummary, LocalScorer, Match, NationalityBreakdown, Player,
    PositionBreakdown, Team,
};
use crate::{LeagueCode, Season, TeamId};

/// Store and live feed behind one shared cache.
pub struct DataSources<F> {
    store: Arc<FootballDatabase>,
    feed: F,
    cache: Arc<CacheLayer>,
    ttl: CacheTtls,
}

impl<F: LiveFeed> DataSources<F> {
    pub fn new(store: Arc<FootballDatabase>, feed: F, cache: Arc<CacheLayer>, ttl: CacheTtls) -> Self {
        Self {
            store,
            feed,
            cache,
            ttl,
        }
    }

    pub fn store(&self) -> &FootballDatabase {
        &self.store
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    pub fn ttl(&self) -> CacheTtls {
        self.ttl
    }

    pub async fn team(&self, team_id: TeamId, season: Season) -> Result<Cached<Team>> {
        let key = QueryKey::Team { team_id, season };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.get_team(team_id, season)
            })
            .await
    }

    pub async fn teams(&self, season: Season) -> Result<Cached<Vec<Team>>> {
        let key = QueryKey::Teams { season };
        self.cache
            .get(&key, self.ttl.default, || async { self.store.get_teams(season) })
            .await
    }

    pub async fn team_by_external_id(
        &self,
        external_id: u32,
        season: Season,
    ) -> Result<Cached<Option<Team>>> {
        let key = QueryKey::TeamByExternalId {
            external_id,
            season,
        };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.find_team_by_external_id(external_id, season)
            })
            .await
    }

    pub async fn players(&self, team_id: TeamId, season: Season) -> Result<Cached<Vec<Player>>> {
        let key = QueryKey::Players { team_id, season };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.get_players(team_id, season)
            })
            .await
    }

    pub async fn matches(&self, team_id: TeamId, season: Season) -> Result<Cached<Vec<Match>>> {
        let key = QueryKey::Matches { team_id, season };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.get_matches(team_id, season)
            })
            .await
    }

    pub async fn local_top_scorers(
        &self,
        season: Season,
        limit: u32,
    ) -> Result<Cached<Vec<LocalScorer>>> {
        let key = QueryKey::LocalTopScorers { season, limit };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.get_top_scorers(season, limit)
            })
            .await
    }

    pub async fn league_summary(&self, season: Season) -> Result<Cached<LeagueSummary>> {
        let key = QueryKey::LeagueSummary { season };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.league_summary(season)
            })
            .await
    }

    pub async fn position_distribution(
        &self,
        season: Season,
    ) -> Result<Cached<Vec<PositionBreakdown>>> {
        let key = QueryKey::PositionDistribution { season };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.position_distribution(season)
            })
            .await
    }

    pub async fn nationality_breakdown(
        &self,
        season: Season,
    ) -> Result<Cached<Vec<NationalityBreakdown>>> {
        let key = QueryKey::NationalityBreakdown { season };
        self.cache
            .get(&key, self.ttl.default, || async {
                self.store.nationality_breakdown(season)
            })
            .await
    }

    pub async fn standings(&self, league: &LeagueCode) -> Result<Cached<Vec<StandingEntry>>> {
        let key = QueryKey::Standings {
            league: league.clone(),
        };
        self.cache
            .get(&key, self.ttl.default, || self.feed.get_standings(league))
            .await
    }

    pub async fn fixtures(&self, league: &LeagueCode) -> Result<Cached<Vec<LiveMatch>>> {
        let key = QueryKey::Fixtures {
            league: league.clone(),
        };
        self.cache
            .get(&key, self.ttl.fixtures, || self.feed.get_fixtures(league))
            .await
    }

    pub async fn results(&self, league: &LeagueCode) -> Result<Cached<Vec<LiveMatch>>> {
        let key = QueryKey::Results {
            league: league.clone(),
        };
        self.cache
            .get(&key, self.ttl.fixtures, || self.feed.get_results(league))
            .await
    }

    pub async fn top_scorers(&self, league: &LeagueCode) -> Result<Cached<Vec<TopScorer>>> {
        let key = QueryKey::TopScorers {
            league: league.clone(),
        };
        self.cache
            .get(&key, self.ttl.default, || self.feed.get_top_scorers(league))
            .await
    }
}
