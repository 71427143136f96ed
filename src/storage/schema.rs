//! Database schema and connection management

use crate::config::default_database_path;
use crate::error::{FootballError, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// SQLite-backed store of teams, players and matches.
///
/// The connection sits behind a mutex so one store can be shared by every
/// request handler.
pub struct FootballDatabase {
    conn: Mutex<Connection>,
}

impl FootballDatabase {
    /// Open the database at the default location.
    pub fn new() -> Result<Self> {
        Self::open(default_database_path())
    }

    /// Open (or create) the database at `path` and ensure tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FootballError::StoreUnavailable {
                message: format!("cannot create {}: {e}", parent.display()),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| FootballError::StoreUnavailable {
            message: format!("cannot open {}: {e}", path.display()),
        })?;
        debug!(path = %path.display(), "opened football database");

        Self::from_connection(conn)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn new_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.initialize_schema()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS teams (
                id INTEGER NOT NULL,
                season INTEGER NOT NULL,
                name TEXT NOT NULL,
                league TEXT NOT NULL,
                external_id INTEGER,
                PRIMARY KEY (id, season)
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_teams_external
             ON teams(external_id, season)
             WHERE external_id IS NOT NULL;

            CREATE TABLE IF NOT EXISTS team_season_stats (
                team_id INTEGER NOT NULL,
                season INTEGER NOT NULL,
                matches_played INTEGER NOT NULL DEFAULT 0 CHECK (matches_played >= 0),
                wins INTEGER NOT NULL DEFAULT 0 CHECK (wins >= 0),
                draws INTEGER NOT NULL DEFAULT 0 CHECK (draws >= 0),
                losses INTEGER NOT NULL DEFAULT 0 CHECK (losses >= 0),
                goals_for INTEGER NOT NULL DEFAULT 0 CHECK (goals_for >= 0),
                goals_against INTEGER NOT NULL DEFAULT 0 CHECK (goals_against >= 0),
                points INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
                PRIMARY KEY (team_id, season),
                FOREIGN KEY (team_id, season) REFERENCES teams(id, season)
            );

            CREATE TABLE IF NOT EXISTS players (
                id INTEGER NOT NULL,
                season INTEGER NOT NULL,
                team_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                position TEXT NOT NULL,
                nationality TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (id, season),
                FOREIGN KEY (team_id, season) REFERENCES teams(id, season)
            );

            CREATE TABLE IF NOT EXISTS player_season_stats (
                player_id INTEGER NOT NULL,
                season INTEGER NOT NULL,
                goals INTEGER NOT NULL DEFAULT 0 CHECK (goals >= 0),
                assists INTEGER NOT NULL DEFAULT 0 CHECK (assists >= 0),
                minutes INTEGER NOT NULL DEFAULT 0 CHECK (minutes >= 0),
                matches INTEGER NOT NULL DEFAULT 0 CHECK (matches >= 0),
                PRIMARY KEY (player_id, season),
                FOREIGN KEY (player_id, season) REFERENCES players(id, season)
            );

            CREATE TABLE IF NOT EXISTS matches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                season INTEGER NOT NULL,
                match_date TEXT NOT NULL,
                home_team_id INTEGER NOT NULL,
                away_team_id INTEGER NOT NULL,
                home_goals INTEGER NOT NULL CHECK (home_goals >= 0),
                away_goals INTEGER NOT NULL CHECK (away_goals >= 0),
                UNIQUE (home_team_id, away_team_id, match_date),
                FOREIGN KEY (home_team_id, season) REFERENCES teams(id, season),
                FOREIGN KEY (away_team_id, season) REFERENCES teams(id, season)
            );

            CREATE INDEX IF NOT EXISTS idx_players_team
             ON players(team_id, season);

            CREATE INDEX IF NOT EXISTS idx_matches_season_date
             ON matches(season, match_date);",
        )?;

        Ok(())
    }
}
