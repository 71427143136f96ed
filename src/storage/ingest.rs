//! Write path used to seed and re-sync the store

use super::{models::*, queries::ensure_team, schema::FootballDatabase};
use crate::error::{FootballError, Result};
use crate::{LeagueCode, PlayerId, Position, Season, TeamId};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing::info;

impl FootballDatabase {
    /// Insert or replace a team and its season aggregates.
    pub fn upsert_team(&self, team: &Team) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        write_team(&tx, team)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert or replace a player. The team must already exist in the same season.
    pub fn upsert_player(&self, player: &Player) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        ensure_team(&tx, player.team_id, player.season)?;
        write_player(&tx, player)?;
        tx.commit()?;
        Ok(())
    }

    /// Append a played match. Returns false when the same fixture on the same
    /// date is already recorded.
    pub fn insert_match(&self, played: &Match) -> Result<bool> {
        let conn = self.conn();
        ensure_team(&conn, played.home_team_id, played.season)?;
        ensure_team(&conn, played.away_team_id, played.season)?;
        write_match(&conn, played)
    }

    /// Remove every stored record.
    pub fn clear_all_data(&self) -> Result<()> {
        self.conn().execute_batch(
            "DELETE FROM matches;
             DELETE FROM player_season_stats;
             DELETE FROM players;
             DELETE FROM team_season_stats;
             DELETE FROM teams;",
        )?;
        Ok(())
    }

    /// Load the La Liga 2024-25 sample into an empty store.
    ///
    /// Returns whether anything was written; a store that already holds
    /// teams is left untouched.
    pub fn seed_sample_data(&self) -> Result<bool> {
        let mut conn = self.conn();
        let existing: u32 = conn.query_row("SELECT COUNT(*) FROM teams", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        let tx = conn.transaction()?;
        let season = Season::new(2024);
        let league = LeagueCode::new("PD");

        for &(id, name, external_id, stats) in SAMPLE_TEAMS {
            let [matches_played, wins, draws, losses, goals_for, goals_against, points] = stats;
            write_team(
                &tx,
                &Team {
                    id: TeamId::new(id),
                    season,
                    name: name.to_string(),
                    league: league.clone(),
                    external_id: Some(external_id),
                    stats: TeamSeasonStats {
                        matches_played,
                        wins,
                        draws,
                        losses,
                        goals_for,
                        goals_against,
                        points,
                    },
                },
            )?;
        }

        for (idx, &(name, team_id, position, nationality, stats)) in SAMPLE_PLAYERS.iter().enumerate() {
            let [goals, assists, matches, minutes] = stats;
            write_player(
                &tx,
                &Player {
                    id: PlayerId::new(idx as u32 + 1),
                    team_id: TeamId::new(team_id),
                    season,
                    name: name.to_string(),
                    position,
                    nationality: nationality.to_string(),
                    stats: PlayerSeasonStats {
                        goals,
                        assists,
                        minutes,
                        matches,
                    },
                },
            )?;
        }

        for &((y, m, d), home, away, home_goals, away_goals) in SAMPLE_MATCHES {
            let date = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
                FootballError::StoreUnavailable {
                    message: format!("sample match date {y}-{m:02}-{d:02} is not a calendar date"),
                }
            })?;
            write_match(
                &tx,
                &Match {
                    season,
                    date,
                    home_team_id: TeamId::new(home),
                    away_team_id: TeamId::new(away),
                    score: Score {
                        home: home_goals,
                        away: away_goals,
                    },
                },
            )?;
        }

        tx.commit()?;
        info!(
            teams = SAMPLE_TEAMS.len(),
            players = SAMPLE_PLAYERS.len(),
            matches = SAMPLE_MATCHES.len(),
            "seeded sample data for {}",
            season
        );
        Ok(true)
    }
}

fn write_team(conn: &Connection, team: &Team) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO teams (id, season, name, league, external_id)
         VALUES (?, ?, ?, ?, ?)",
        params![
            team.id.as_u32(),
            team.season.as_u16(),
            team.name,
            team.league.as_str(),
            team.external_id
        ],
    )?;

    let stats = &team.stats;
    conn.execute(
        "INSERT OR REPLACE INTO team_season_stats
         (team_id, season, matches_played, wins, draws, losses, goals_for, goals_against, points)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            team.id.as_u32(),
            team.season.as_u16(),
            stats.matches_played,
            stats.wins,
            stats.draws,
            stats.losses,
            stats.goals_for,
            stats.goals_against,
            stats.points
        ],
    )?;
    Ok(())
}

fn write_player(conn: &Connection, player: &Player) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO players (id, season, team_id, name, position, nationality)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            player.id.as_u32(),
            player.season.as_u16(),
            player.team_id.as_u32(),
            player.name,
            player.position.as_str(),
            player.nationality
        ],
    )?;

    let stats = &player.stats;
    conn.execute(
        "INSERT OR REPLACE INTO player_season_stats
         (player_id, season, goals, assists, minutes, matches)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            player.id.as_u32(),
            player.season.as_u16(),
            stats.goals,
            stats.assists,
            stats.minutes,
            stats.matches
        ],
    )?;
    Ok(())
}

fn write_match(conn: &Connection, played: &Match) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO matches
         (season, match_date, home_team_id, away_team_id, home_goals, away_goals)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            played.season.as_u16(),
            played.date,
            played.home_team_id.as_u32(),
            played.away_team_id.as_u32(),
            played.score.home,
            played.score.away
        ],
    )?;
    Ok(inserted > 0)
}

/// (id, name, football-data id, [played, won, drawn, lost, gf, ga, points])
type SampleTeam = (u32, &'static str, u32, [u32; 7]);

const SAMPLE_TEAMS: &[SampleTeam] = &[
    (1, "Real Madrid", 86, [28, 20, 5, 3, 58, 22, 65]),
    (2, "FC Barcelona", 81, [28, 19, 6, 3, 62, 28, 63]),
    (3, "Atletico Madrid", 78, [28, 15, 8, 5, 42, 25, 53]),
    (4, "Sevilla FC", 559, [28, 12, 9, 7, 35, 32, 45]),
    (5, "Real Sociedad", 92, [28, 14, 7, 7, 38, 28, 49]),
    (6, "Real Betis", 90, [28, 13, 8, 7, 40, 35, 47]),
    (7, "Villarreal CF", 94, [28, 12, 10, 6, 36, 30, 46]),
    (8, "Athletic Bilbao", 77, [28, 14, 6, 8, 42, 32, 48]),
    (9, "Valencia CF", 95, [28, 10, 10, 8, 32, 35, 40]),
    (10, "Osasuna", 79, [28, 11, 9, 8, 38, 36, 42]),
];

/// (name, team id, position, nationality, [goals, assists, matches, minutes])
type SamplePlayer = (&'static str, u32, Position, &'static str, [u32; 4]);

const SAMPLE_PLAYERS: &[SamplePlayer] = &[
    ("Vinicius Junior", 1, Position::Forward, "Brazil", [15, 7, 25, 2100]),
    ("Jude Bellingham", 1, Position::Midfielder, "England", [12, 8, 28, 2450]),
    ("Kylian Mbappe", 1, Position::Forward, "France", [18, 5, 26, 2180]),
    ("Lamine Yamal", 2, Position::Forward, "Spain", [8, 12, 27, 2300]),
    ("Robert Lewandowski", 2, Position::Forward, "Poland", [14, 4, 25, 2050]),
    ("Pedri", 2, Position::Midfielder, "Spain", [5, 9, 24, 0]),
    ("Antoine Griezmann", 3, Position::Midfielder, "France", [10, 8, 26, 2150]),
    ("Julian Alvarez", 3, Position::Forward, "Argentina", [12, 6, 27, 2280]),
    ("Youssef En-Nesyri", 4, Position::Forward, "Morocco", [9, 3, 23, 1850]),
    ("Takefusa Kubo", 5, Position::Forward, "Japan", [7, 6, 25, 0]),
    ("Isco", 6, Position::Midfielder, "Spain", [4, 7, 22, 0]),
    ("Gerard Moreno", 7, Position::Forward, "Spain", [8, 4, 21, 0]),
    ("Nico Williams", 8, Position::Forward, "Spain", [6, 10, 26, 0]),
    ("Hugo Duro", 9, Position::Forward, "Spain", [11, 3, 24, 1980]),
    ("Ante Budimir", 10, Position::Forward, "Croatia", [13, 2, 27, 2350]),
];

/// ((year, month, day), home, away, home goals, away goals)
type SampleMatch = ((i32, u32, u32), u32, u32, u32, u32);

const SAMPLE_MATCHES: &[SampleMatch] = &[
    ((2025, 3, 2), 2, 6, 4, 2),
    ((2025, 3, 2), 10, 8, 1, 1),
    ((2025, 3, 5), 6, 5, 3, 0),
    ((2025, 3, 6), 4, 9, 2, 1),
    ((2025, 3, 7), 8, 2, 2, 2),
    ((2025, 3, 7), 3, 7, 1, 0),
    ((2025, 3, 8), 1, 10, 3, 1),
];
