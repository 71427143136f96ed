//! Read-only queries over the persisted season records

use super::{models::*, schema::FootballDatabase};
use crate::error::{FootballError, Result};
use crate::{LeagueCode, PlayerId, Position, Season, TeamId};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TEAM_COLUMNS: &str = "t.id, t.season, t.name, t.league, t.external_id,
     COALESCE(s.matches_played, 0), COALESCE(s.wins, 0), COALESCE(s.draws, 0),
     COALESCE(s.losses, 0), COALESCE(s.goals_for, 0), COALESCE(s.goals_against, 0),
     COALESCE(s.points, 0)";

const PLAYER_COLUMNS: &str = "p.id, p.team_id, p.season, p.name, p.position, p.nationality,
     COALESCE(ps.goals, 0), COALESCE(ps.assists, 0), COALESCE(ps.minutes, 0),
     COALESCE(ps.matches, 0)";

impl FootballDatabase {
    /// Fetch one team with its aggregate season stats.
    pub fn get_team(&self, team_id: TeamId, season: Season) -> Result<Team> {
        let conn = self.conn();
        load_team(&conn, team_id, season)?
            .ok_or_else(|| FootballError::not_found("team", team_id, season))
    }

    /// All teams of a season, best placed first.
    pub fn get_teams(&self, season: Season) -> Result<Vec<Team>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TEAM_COLUMNS}
             FROM teams t
             LEFT JOIN team_season_stats s ON s.team_id = t.id AND s.season = t.season
             WHERE t.season = ?
             ORDER BY COALESCE(s.points, 0) DESC,
                      COALESCE(s.goals_for, 0) - COALESCE(s.goals_against, 0) DESC,
                      COALESCE(s.goals_for, 0) DESC,
                      t.name ASC"
        ))?;

        let rows = stmt.query_map(params![season.as_u16()], row_to_team)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Map an id issued by the live API back to the local team.
    pub fn find_team_by_external_id(&self, external_id: u32, season: Season) -> Result<Option<Team>> {
        let conn = self.conn();
        let team = conn
            .query_row(
                &format!(
                    "SELECT {TEAM_COLUMNS}
                     FROM teams t
                     LEFT JOIN team_season_stats s ON s.team_id = t.id AND s.season = t.season
                     WHERE t.external_id = ? AND t.season = ?"
                ),
                params![external_id, season.as_u16()],
                row_to_team,
            )
            .optional()?;
        Ok(team)
    }

    /// Players of a team, top scorers first then by name.
    pub fn get_players(&self, team_id: TeamId, season: Season) -> Result<Vec<Player>> {
        let conn = self.conn();
        ensure_team(&conn, team_id, season)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLUMNS}
             FROM players p
             LEFT JOIN player_season_stats ps ON ps.player_id = p.id AND ps.season = p.season
             WHERE p.team_id = ? AND p.season = ?
             ORDER BY COALESCE(ps.goals, 0) DESC, p.name ASC"
        ))?;

        let rows = stmt.query_map(params![team_id.as_u32(), season.as_u16()], row_to_player)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Matches a team played in a season, oldest first.
    pub fn get_matches(&self, team_id: TeamId, season: Season) -> Result<Vec<Match>> {
        let conn = self.conn();
        ensure_team(&conn, team_id, season)?;

        let mut stmt = conn.prepare(
            "SELECT season, match_date, home_team_id, away_team_id, home_goals, away_goals
             FROM matches
             WHERE season = ?1 AND (home_team_id = ?2 OR away_team_id = ?2)
             ORDER BY match_date ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![season.as_u16(), team_id.as_u32()], row_to_match)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Leading scorers of the season from the local tables.
    pub fn get_top_scorers(&self, season: Season, limit: u32) -> Result<Vec<LocalScorer>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.team_id, t.name, p.position, p.nationality,
                    ps.goals, ps.assists, ps.minutes, ps.matches
             FROM players p
             JOIN player_season_stats ps ON ps.player_id = p.id AND ps.season = p.season
             JOIN teams t ON t.id = p.team_id AND t.season = p.season
             WHERE p.season = ? AND ps.goals > 0
             ORDER BY ps.goals DESC, ps.assists DESC, p.name ASC
             LIMIT ?",
        )?;

        let rows = stmt.query_map(params![season.as_u16(), limit], |row| {
            Ok(LocalScorer {
                player_id: PlayerId::new(row.get(0)?),
                name: row.get(1)?,
                team_id: TeamId::new(row.get(2)?),
                team_name: row.get(3)?,
                position: position_column(row, 4)?,
                nationality: row.get(5)?,
                stats: PlayerSeasonStats {
                    goals: row.get(6)?,
                    assists: row.get(7)?,
                    minutes: row.get(8)?,
                    matches: row.get(9)?,
                },
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Whether any team has been stored for `season`.
    pub fn has_season(&self, season: Season) -> Result<bool> {
        let count: u32 = self.conn().query_row(
            "SELECT COUNT(*) FROM teams WHERE season = ?",
            params![season.as_u16()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

pub(crate) fn load_team(conn: &Connection, team_id: TeamId, season: Season) -> Result<Option<Team>> {
    let team = conn
        .query_row(
            &format!(
                "SELECT {TEAM_COLUMNS}
                 FROM teams t
                 LEFT JOIN team_season_stats s ON s.team_id = t.id AND s.season = t.season
                 WHERE t.id = ? AND t.season = ?"
            ),
            params![team_id.as_u32(), season.as_u16()],
            row_to_team,
        )
        .optional()?;
    Ok(team)
}

pub(crate) fn ensure_team(conn: &Connection, team_id: TeamId, season: Season) -> Result<()> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM teams WHERE id = ? AND season = ?",
            params![team_id.as_u32(), season.as_u16()],
            |_| Ok(()),
        )
        .optional()?;

    exists.ok_or_else(|| FootballError::not_found("team", team_id, season))
}

fn row_to_team(row: &Row) -> rusqlite::Result<Team> {
    let league: String = row.get(3)?;
    Ok(Team {
        id: TeamId::new(row.get(0)?),
        season: Season::new(row.get(1)?),
        name: row.get(2)?,
        league: LeagueCode::new(league),
        external_id: row.get(4)?,
        stats: TeamSeasonStats {
            matches_played: row.get(5)?,
            wins: row.get(6)?,
            draws: row.get(7)?,
            losses: row.get(8)?,
            goals_for: row.get(9)?,
            goals_against: row.get(10)?,
            points: row.get(11)?,
        },
    })
}

fn row_to_player(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: PlayerId::new(row.get(0)?),
        team_id: TeamId::new(row.get(1)?),
        season: Season::new(row.get(2)?),
        name: row.get(3)?,
        position: position_column(row, 4)?,
        nationality: row.get(5)?,
        stats: PlayerSeasonStats {
            goals: row.get(6)?,
            assists: row.get(7)?,
            minutes: row.get(8)?,
            matches: row.get(9)?,
        },
    })
}

fn row_to_match(row: &Row) -> rusqlite::Result<Match> {
    Ok(Match {
        season: Season::new(row.get(0)?),
        date: row.get(1)?,
        home_team_id: TeamId::new(row.get(2)?),
        away_team_id: TeamId::new(row.get(3)?),
        score: Score {
            home: row.get(4)?,
            away: row.get(5)?,
        },
    })
}

pub(crate) fn position_column(row: &Row, idx: usize) -> rusqlite::Result<Position> {
    let raw: String = row.get(idx)?;
    raw.parse::<Position>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
