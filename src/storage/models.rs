//! Data models for the storage layer

use crate::{LeagueCode, PlayerId, Position, Season, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate counters for one team in one season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSeasonStats {
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl TeamSeasonStats {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

/// Team as persisted for a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub season: Season,
    pub name: String,
    pub league: LeagueCode,
    /// Id of the same club in the live API, used to join live data.
    pub external_id: Option<u32>,
    pub stats: TeamSeasonStats,
}

/// Per-season counters for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSeasonStats {
    pub goals: u32,
    pub assists: u32,
    pub minutes: u32,
    pub matches: u32,
}

/// Player information stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub season: Season,
    pub name: String,
    pub position: Position,
    pub nationality: String,
    pub stats: PlayerSeasonStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// Result of a match from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl MatchOutcome {
    pub fn as_char(&self) -> char {
        match self {
            MatchOutcome::Win => 'W',
            MatchOutcome::Draw => 'D',
            MatchOutcome::Loss => 'L',
        }
    }
}

/// A played match. Historical records are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub season: Season,
    pub date: NaiveDate,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub score: Score,
}

impl Match {
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// `(scored, conceded)` for `team_id`, or `None` if it did not play.
    pub fn goals_for_team(&self, team_id: TeamId) -> Option<(u32, u32)> {
        if self.home_team_id == team_id {
            Some((self.score.home, self.score.away))
        } else if self.away_team_id == team_id {
            Some((self.score.away, self.score.home))
        } else {
            None
        }
    }

    pub fn outcome_for(&self, team_id: TeamId) -> Option<MatchOutcome> {
        let (scored, conceded) = self.goals_for_team(team_id)?;
        Some(match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
        })
    }
}

/// A scorer from the local tables, used when the live list is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalScorer {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub team_name: String,
    pub position: Position,
    pub nationality: String,
    pub stats: PlayerSeasonStats,
}

/// Headline totals for a season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSummary {
    pub teams: u32,
    pub players: u32,
    pub total_goals: i64,
    pub total_assists: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionBreakdown {
    pub position: Position,
    pub players: u32,
    pub goals: i64,
    pub assists: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalityBreakdown {
    pub nationality: String,
    pub players: u32,
    pub goals: i64,
}
