//! Per-player and per-team metrics, plus the league views built on them.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::sources::DataSources;
use super::{DataQuality, Sourced};
use crate::api::{LiveFeed, LiveMatch, ScorerIdentity, StandingEntry, TeamRef, TopScorer};
use crate::error::Result;
use crate::storage::{
    LeagueSummary, LocalScorer, MatchOutcome, NationalityBreakdown, Player, PlayerSeasonStats,
    PositionBreakdown, Team, TeamSeasonStats,
};
use crate::{LeagueCode, PlayerId, Position, Season, TeamId};


/// Rate metrics for one player over a season.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMetrics {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub position: Position,
    pub goals: u32,
    pub assists: u32,
    pub matches: u32,
    pub goal_contributions: u32,
    pub goals_per_match: f64,
    pub assists_per_match: f64,
    /// (goals + assists) per match played.
    pub efficiency: f64,
    /// `None` until the player has scored with tracked minutes.
    pub minutes_per_goal: Option<f64>,
}

/// Rate metrics for one team over a season.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetrics {
    pub team_id: TeamId,
    pub name: String,
    pub season: Season,
    pub matches_played: u32,
    pub points: u32,
    pub win_rate: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub points_per_match: f64,
    pub goal_difference: i64,
}

/// Recent results of a team, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamForm {
    pub team_id: TeamId,
    pub season: Season,
    pub results: Vec<MatchOutcome>,
    /// Compact form string such as `WWDLW`.
    pub form: String,
    pub points: u32,
}

/// Headline numbers for a league overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub season: Season,
    pub league: LeagueCode,
    pub summary: LeagueSummary,
    pub leader: Option<StandingEntry>,
    pub top_scorer: Option<TopScorer>,
    pub positions: Vec<PositionBreakdown>,
    pub nationalities: Vec<NationalityBreakdown>,
    /// Worst quality among the live parts (leader and top scorer).
    pub quality: DataQuality,
}

/// Rate over matches played; a player or team without matches rates 0.
fn per_match(total: u32, matches: u32) -> f64 {
    if matches == 0 {
        return 0.0;
    }
    f64::from(total) / f64::from(matches)
}

pub fn compute_player_metrics(player: &Player, stats: &PlayerSeasonStats) -> PlayerMetrics {
    let contributions = stats.goals.saturating_add(stats.assists);
    let minutes_per_goal = (stats.goals > 0 && stats.minutes > 0)
        .then(|| f64::from(stats.minutes) / f64::from(stats.goals));

    PlayerMetrics {
        player_id: player.id,
        name: player.name.clone(),
        team_id: player.team_id,
        position: player.position,
        goals: stats.goals,
        assists: stats.assists,
        matches: stats.matches,
        goal_contributions: contributions,
        goals_per_match: per_match(stats.goals, stats.matches),
        assists_per_match: per_match(stats.assists, stats.matches),
        efficiency: per_match(contributions, stats.matches),
        minutes_per_goal,
    }
}

pub fn compute_team_metrics(team: &Team, stats: &TeamSeasonStats) -> TeamMetrics {
    TeamMetrics {
        team_id: team.id,
        name: team.name.clone(),
        season: team.season,
        matches_played: stats.matches_played,
        points: stats.points,
        win_rate: per_match(stats.wins, stats.matches_played),
        avg_goals_for: per_match(stats.goals_for, stats.matches_played),
        avg_goals_against: per_match(stats.goals_against, stats.matches_played),
        points_per_match: per_match(stats.points, stats.matches_played),
        goal_difference: stats.goal_difference(),
    }
}

/// League table built from stored team aggregates, in stored order.
fn local_standings(teams: &[Team]) -> Vec<StandingEntry> {
    teams
        .iter()
        .enumerate()
        .map(|(idx, team)| StandingEntry {
            rank: idx as u32 + 1,
            team: TeamRef {
                id: team.external_id.unwrap_or(0),
                name: team.name.clone(),
                short_name: None,
                tla: None,
            },
            points: team.stats.points,
            goal_difference: team.stats.goal_difference() as i32,
            played: team.stats.matches_played,
            won: team.stats.wins,
            draw: team.stats.draws,
            lost: team.stats.losses,
            goals_for: team.stats.goals_for,
            goals_against: team.stats.goals_against,
            team_id: Some(team.id),
        })
        .collect()
}

fn local_scorer_to_top_scorer(scorer: &LocalScorer) -> TopScorer {
    TopScorer {
        player: ScorerIdentity {
            id: scorer.player_id.as_u32(),
            name: scorer.name.clone(),
            nationality: scorer.nationality.clone(),
            position: Some(scorer.position),
        },
        team: TeamRef {
            id: 0,
            name: scorer.team_name.clone(),
            short_name: None,
            tla: None,
        },
        goals: scorer.stats.goals,
        assists: scorer.stats.assists,
        played_matches: scorer.stats.matches,
    }
}

/// Metric queries over the cached data sources.
pub struct StatsEngine<F> {
    sources: Arc<DataSources<F>>,
}

impl<F> Clone for StatsEngine<F> {
    fn clone(&self) -> Self {
        Self {
            sources: Arc::clone(&self.sources),
        }
    }
}

impl<F: LiveFeed> StatsEngine<F> {
    pub fn new(sources: Arc<DataSources<F>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &DataSources<F> {
        &self.sources
    }

    /// Metrics for every player of a team, in squad order (top scorers first).
    pub async fn player_metrics(&self, team_id: TeamId, season: Season) -> Result<Vec<PlayerMetrics>> {
        let players = self.sources.players(team_id, season).await?;
        Ok(players
            .iter()
            .map(|p| compute_player_metrics(p, &p.stats))
            .collect())
    }

    pub async fn team_metrics(&self, team_id: TeamId, season: Season) -> Result<TeamMetrics> {
        let team = self.sources.team(team_id, season).await?;
        Ok(compute_team_metrics(&team, &team.stats))
    }

    /// Team metrics for the whole season, in table order.
    pub async fn efficiency_table(&self, season: Season) -> Result<Vec<TeamMetrics>> {
        let teams = self.sources.teams(season).await?;
        Ok(teams
            .iter()
            .map(|t| compute_team_metrics(t, &t.stats))
            .collect())
    }

    /// Outcomes of the team's last `last_n` stored matches, newest last.
    pub async fn team_form(&self, team_id: TeamId, season: Season, last_n: usize) -> Result<TeamForm> {
        let matches = self.sources.matches(team_id, season).await?;
        let skip = matches.len().saturating_sub(last_n);

        let results: Vec<MatchOutcome> = matches
            .iter()
            .skip(skip)
            .filter_map(|m| m.outcome_for(team_id))
            .collect();

        let points = results
            .iter()
            .map(|r| match r {
                MatchOutcome::Win => 3,
                MatchOutcome::Draw => 1,
                MatchOutcome::Loss => 0,
            })
            .sum();

        Ok(TeamForm {
            team_id,
            season,
            form: results.iter().map(MatchOutcome::as_char).collect(),
            results,
            points,
        })
    }

    /// Live league table with local team ids attached.
    ///
    /// When the API is down and nothing is cached, the table is rebuilt from
    /// stored team aggregates and marked [`DataQuality::Degraded`].
    pub async fn standings(&self, league: &LeagueCode, season: Season) -> Result<Sourced<Vec<StandingEntry>>> {
        match self.sources.standings(league).await {
            Ok(cached) => {
                let mut entries = cached.value().clone();
                for entry in entries.iter_mut().filter(|e| e.team.id != 0) {
                    let local = self.sources.team_by_external_id(entry.team.id, season).await?;
                    entry.team_id = local.value().as_ref().map(|t| t.id);
                }
                Ok(Sourced::from_cached(&cached, entries))
            }
            Err(err) if err.is_recoverable() => {
                warn!(%league, %season, error = %err, "live standings unavailable, using stored table");
                let teams = self.sources.teams(season).await?;
                Ok(Sourced::degraded(local_standings(&teams)))
            }
            Err(err) => Err(err),
        }
    }

    /// Leading scorers, live when possible, otherwise from stored player stats.
    pub async fn top_scorers(
        &self,
        league: &LeagueCode,
        season: Season,
        limit: u32,
    ) -> Result<Sourced<Vec<TopScorer>>> {
        match self.sources.top_scorers(league).await {
            Ok(cached) => {
                let scorers = cached.iter().take(limit as usize).cloned().collect();
                Ok(Sourced::from_cached(&cached, scorers))
            }
            Err(err) if err.is_recoverable() => {
                warn!(%league, %season, error = %err, "live scorers unavailable, using stored stats");
                let local = self.sources.local_top_scorers(season, limit).await?;
                Ok(Sourced::degraded(
                    local.iter().map(local_scorer_to_top_scorer).collect(),
                ))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn fixtures(&self, league: &LeagueCode) -> Result<Sourced<Vec<LiveMatch>>> {
        let cached = self.sources.fixtures(league).await?;
        Ok(Sourced::from_cached(&cached, cached.value().clone()))
    }

    pub async fn results(&self, league: &LeagueCode) -> Result<Sourced<Vec<LiveMatch>>> {
        let cached = self.sources.results(league).await?;
        Ok(Sourced::from_cached(&cached, cached.value().clone()))
    }

    /// League summary, current leader and top scorer.
    pub async fn dashboard(&self, league: &LeagueCode, season: Season) -> Result<Dashboard> {
        let summary = self.sources.league_summary(season).await?;
        let positions = self.sources.position_distribution(season).await?;
        let nationalities = self.sources.nationality_breakdown(season).await?;
        let standings = self.standings(league, season).await?;
        let scorers = self.top_scorers(league, season, 1).await?;

        Ok(Dashboard {
            season,
            league: league.clone(),
            summary: *summary.value(),
            leader: standings.data.first().cloned(),
            top_scorer: scorers.data.first().cloned(),
            positions: positions.value().clone(),
            nationalities: nationalities.value().clone(),
            quality: standings.quality.worst(scorers.quality),
        })
    }
}
