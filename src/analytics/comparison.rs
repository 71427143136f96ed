//! Normalized multi-team comparison vectors.
//!
//! Each axis is rescaled on its own with `(v - min) / (max - min)` across the
//! requested teams. An axis on which every team has the same value carries no
//! information and maps everyone to 0.5. Axes are never inverted: the team
//! that conceded most sits at 1.0 on goals against.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::sources::DataSources;
use super::stats::compute_team_metrics;
use crate::api::LiveFeed;
use crate::error::Result;
use crate::storage::Team;
use crate::{Season, TeamId};


/// A compared metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Points,
    Wins,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
    WinRate,
}

impl Axis {
    pub const ALL: [Axis; 6] = [
        Axis::Points,
        Axis::Wins,
        Axis::GoalsFor,
        Axis::GoalsAgainst,
        Axis::GoalDifference,
        Axis::WinRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::Points => "Points",
            Axis::Wins => "Wins",
            Axis::GoalsFor => "Goals for",
            Axis::GoalsAgainst => "Goals against",
            Axis::GoalDifference => "Goal difference",
            Axis::WinRate => "Win rate",
        }
    }
}

/// One value per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricVector {
    pub points: f64,
    pub wins: f64,
    pub goals_for: f64,
    pub goals_against: f64,
    pub goal_difference: f64,
    pub win_rate: f64,
}

impl MetricVector {
    /// Raw axis values for a team.
    pub fn for_team(team: &Team) -> Self {
        let metrics = compute_team_metrics(team, &team.stats);
        Self {
            points: f64::from(team.stats.points),
            wins: f64::from(team.stats.wins),
            goals_for: f64::from(team.stats.goals_for),
            goals_against: f64::from(team.stats.goals_against),
            goal_difference: metrics.goal_difference as f64,
            win_rate: metrics.win_rate,
        }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Points => self.points,
            Axis::Wins => self.wins,
            Axis::GoalsFor => self.goals_for,
            Axis::GoalsAgainst => self.goals_against,
            Axis::GoalDifference => self.goal_difference,
            Axis::WinRate => self.win_rate,
        }
    }

    fn set(&mut self, axis: Axis, value: f64) {
        let slot = match axis {
            Axis::Points => &mut self.points,
            Axis::Wins => &mut self.wins,
            Axis::GoalsFor => &mut self.goals_for,
            Axis::GoalsAgainst => &mut self.goals_against,
            Axis::GoalDifference => &mut self.goal_difference,
            Axis::WinRate => &mut self.win_rate,
        };
        *slot = value;
    }

    /// Values in [`Axis::ALL`] order, for charting.
    pub fn to_array(&self) -> [f64; 6] {
        Axis::ALL.map(|axis| self.get(axis))
    }
}

/// A team's raw and rescaled metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedVector {
    pub team_id: TeamId,
    pub name: String,
    pub raw: MetricVector,
    pub normalized: MetricVector,
}

/// Teams in request order with their normalized vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub season: Season,
    pub axes: Vec<Axis>,
    pub teams: Vec<NormalizedVector>,
}

impl Comparison {
    pub fn get(&self, team_id: TeamId) -> Option<&NormalizedVector> {
        self.teams.iter().find(|v| v.team_id == team_id)
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }
}

/// Rescale `values` onto [0, 1]; all-equal input maps to 0.5.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            if range > 0.0 {
                (v - min) / range
            } else {
                0.5
            }
        })
        .collect()
}

/// Build the comparison for already loaded teams, keeping their order.
pub fn compare_teams(teams: &[Team], season: Season) -> Comparison {
    let raw: Vec<MetricVector> = teams.iter().map(MetricVector::for_team).collect();
    let mut normalized = vec![MetricVector::default(); raw.len()];

    for axis in Axis::ALL {
        let values: Vec<f64> = raw.iter().map(|v| v.get(axis)).collect();
        for (slot, value) in normalized.iter_mut().zip(normalize(&values)) {
            slot.set(axis, value);
        }
    }

    let vectors = teams
        .iter()
        .zip(raw)
        .zip(normalized)
        .map(|((team, raw), normalized)| NormalizedVector {
            team_id: team.id,
            name: team.name.clone(),
            raw,
            normalized,
        })
        .collect();

    Comparison {
        season,
        axes: Axis::ALL.to_vec(),
        teams: vectors,
    }
}

/// Loads teams through the cache and compares them.
pub struct ComparisonEngine<F> {
    sources: Arc<DataSources<F>>,
}

impl<F: LiveFeed> ComparisonEngine<F> {
    pub fn new(sources: Arc<DataSources<F>>) -> Self {
        Self { sources }
    }

    /// Compare `team_ids` in the given order. Repeated ids keep their first
    /// position; an unknown id fails with `NotFound`.
    pub async fn compare(&self, team_ids: &[TeamId], season: Season) -> Result<Comparison> {
        let mut seen = HashSet::new();
        let mut teams = Vec::with_capacity(team_ids.len());

        for &team_id in team_ids {
            if !seen.insert(team_id) {
                continue;
            }
            let team = self.sources.team(team_id, season).await?;
            teams.push(team.value().clone());
        }

        Ok(compare_teams(&teams, season))
    }
}
