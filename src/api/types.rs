//! Wire types for the football-data v4 API and the records built from them.

use crate::storage::Score;
use crate::{Position, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};


/// The API sends explicit `null` for values it does not know yet (e.g. the
/// teams of an undecided knockout fixture); read those as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Team reference as the API delivers it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tla: Option<String>,
}

impl TeamRef {
    /// Short name when the API provides one.
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

/// Envelope of `/competitions/{code}/standings`
#[derive(Debug, Default, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub standings: Vec<StandingTable>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingTable {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub table: Vec<TableRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: TeamRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub played_games: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub won: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub draw: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lost: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals_for: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals_against: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goal_difference: i32,
}

impl StandingsResponse {
    /// Rows of the overall table in rank order. Home/away splits are ignored;
    /// a response without a `TOTAL` table falls back to its first table.
    pub fn into_entries(self) -> Vec<StandingEntry> {
        let mut tables = self.standings;
        let idx = tables
            .iter()
            .position(|t| t.kind.eq_ignore_ascii_case("TOTAL"))
            .unwrap_or(0);

        if tables.is_empty() {
            return Vec::new();
        }

        let mut entries: Vec<StandingEntry> = tables
            .swap_remove(idx)
            .table
            .into_iter()
            .map(StandingEntry::from)
            .collect();
        entries.sort_by_key(|e| e.rank);
        entries
    }
}

/// One row of a live league table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub rank: u32,
    pub team: TeamRef,
    pub points: u32,
    pub goal_difference: i32,
    pub played: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    /// Local team this row was reconciled to, if any.
    pub team_id: Option<TeamId>,
}

impl From<TableRow> for StandingEntry {
    fn from(row: TableRow) -> Self {
        Self {
            rank: row.position,
            team: row.team,
            points: row.points,
            goal_difference: row.goal_difference,
            played: row.played_games,
            won: row.won,
            draw: row.draw,
            lost: row.lost,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            team_id: None,
        }
    }
}

/// Envelope of `/competitions/{code}/matches`
#[derive(Debug, Default, Deserialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default)]
    pub utc_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub matchday: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub home_team: TeamRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub away_team: TeamRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: WireScore,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_time: GoalPair,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalPair {
    #[serde(default)]
    pub home: Option<u32>,
    #[serde(default)]
    pub away: Option<u32>,
}

/// A fixture or result from the live API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatch {
    pub id: u64,
    pub kickoff: Option<DateTime<Utc>>,
    pub status: String,
    pub matchday: Option<u32>,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    /// Full-time score, only present once both sides are known.
    pub score: Option<Score>,
}

impl From<WireMatch> for LiveMatch {
    fn from(m: WireMatch) -> Self {
        let score = match (m.score.full_time.home, m.score.full_time.away) {
            (Some(home), Some(away)) => Some(Score { home, away }),
            _ => None,
        };

        Self {
            id: m.id,
            kickoff: m.utc_date,
            status: m.status,
            matchday: m.matchday,
            home_team: m.home_team,
            away_team: m.away_team,
            score,
        }
    }
}

impl MatchesResponse {
    pub fn into_live_matches(self) -> Vec<LiveMatch> {
        self.matches.into_iter().map(LiveMatch::from).collect()
    }
}

/// Envelope of `/competitions/{code}/scorers`
#[derive(Debug, Default, Deserialize)]
pub struct ScorersResponse {
    #[serde(default)]
    pub scorers: Vec<WireScorer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScorer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub player: WirePlayer,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: TeamRef,
    #[serde(default)]
    pub goals: Option<u32>,
    #[serde(default)]
    pub assists: Option<u32>,
    #[serde(default)]
    pub played_matches: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WirePlayer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Scorer identity as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerIdentity {
    pub id: u32,
    pub name: String,
    pub nationality: String,
    pub position: Option<Position>,
}

/// A player and their goal tally from the live scorers list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopScorer {
    pub player: ScorerIdentity,
    pub team: TeamRef,
    pub goals: u32,
    pub assists: u32,
    pub played_matches: u32,
}

impl From<WireScorer> for TopScorer {
    fn from(s: WireScorer) -> Self {
        // `position` is the finer label but is often null; `section` is always set.
        let position = s
            .player
            .position
            .as_deref()
            .and_then(|p| p.parse().ok())
            .or_else(|| s.player.section.as_deref().and_then(|p| p.parse().ok()));

        Self {
            player: ScorerIdentity {
                id: s.player.id,
                name: s.player.name,
                nationality: s.player.nationality.unwrap_or_default(),
                position,
            },
            team: s.team,
            goals: s.goals.unwrap_or(0),
            assists: s.assists.unwrap_or(0),
            played_matches: s.played_matches.unwrap_or(0),
        }
    }
}

impl ScorersResponse {
    pub fn into_top_scorers(self) -> Vec<TopScorer> {
        self.scorers.into_iter().map(TopScorer::from).collect()
    }
}
