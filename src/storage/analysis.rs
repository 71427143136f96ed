//! Season-wide aggregates over the stored records

use super::{models::*, queries::position_column, schema::FootballDatabase};
use crate::error::Result;
use crate::Season;
use rusqlite::params;

impl FootballDatabase {
    /// Team count, player count and goal/assist totals for a season.
    pub fn league_summary(&self, season: Season) -> Result<LeagueSummary> {
        let conn = self.conn();
        let teams: u32 = conn.query_row(
            "SELECT COUNT(*) FROM teams WHERE season = ?",
            params![season.as_u16()],
            |row| row.get(0),
        )?;

        let (players, total_goals, total_assists) = conn.query_row(
            "SELECT COUNT(p.id), COALESCE(SUM(ps.goals), 0), COALESCE(SUM(ps.assists), 0)
             FROM players p
             LEFT JOIN player_season_stats ps ON ps.player_id = p.id AND ps.season = p.season
             WHERE p.season = ?",
            params![season.as_u16()],
            |row| Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)),
        )?;

        Ok(LeagueSummary {
            teams,
            players,
            total_goals,
            total_assists,
        })
    }

    /// Player counts and output per position, most populated first.
    pub fn position_distribution(&self, season: Season) -> Result<Vec<PositionBreakdown>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT p.position, COUNT(*), COALESCE(SUM(ps.goals), 0), COALESCE(SUM(ps.assists), 0)
             FROM players p
             LEFT JOIN player_season_stats ps ON ps.player_id = p.id AND ps.season = p.season
             WHERE p.season = ?
             GROUP BY p.position
             ORDER BY COUNT(*) DESC, p.position ASC",
        )?;

        let rows = stmt.query_map(params![season.as_u16()], |row| {
            Ok(PositionBreakdown {
                position: position_column(row, 0)?,
                players: row.get(1)?,
                goals: row.get(2)?,
                assists: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Player counts and goals per nationality, most represented first.
    pub fn nationality_breakdown(&self, season: Season) -> Result<Vec<NationalityBreakdown>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT p.nationality, COUNT(*), COALESCE(SUM(ps.goals), 0)
             FROM players p
             LEFT JOIN player_season_stats ps ON ps.player_id = p.id AND ps.season = p.season
             WHERE p.season = ?
             GROUP BY p.nationality
             ORDER BY COUNT(*) DESC, COALESCE(SUM(ps.goals), 0) DESC, p.nationality ASC",
        )?;

        let rows = stmt.query_map(params![season.as_u16()], |row| {
            Ok(NationalityBreakdown {
                nationality: row.get(0)?,
                players: row.get(1)?,
                goals: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
