//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use types::{LeagueCode, Season, TeamId};

/// Arguments shared by every query command.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Season start year or label (e.g. 2024 or 2024-25).
    #[clap(long, short, default_value_t = Season::default())]
    pub season: Season,

    /// Competition code (or set `FOOTBALL_LEAGUE`), e.g. PD for La Liga.
    #[clap(long, short)]
    pub league: Option<LeagueCode>,

    /// Output results as JSON instead of text lines.
    #[clap(long)]
    pub json: bool,
}

/// Overrides for the engine configuration read from the environment.
#[derive(Debug, Args)]
pub struct EngineArgs {
    /// SQLite database file (or set `DATABASE_PATH`).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Base URL of the football API (or set `FOOTBALL_API_URL`).
    #[clap(long, global = true)]
    pub api_url: Option<String>,

    /// Cache time-to-live in seconds (or set `CACHE_TTL`).
    #[clap(long, global = true)]
    pub ttl: Option<u64>,

    /// Give up on the live API after the first failed attempt.
    #[clap(long, global = true)]
    pub fail_fast: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// League table, live when the API is reachable.
    Standings {
        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Leading goal scorers.
    TopScorers {
        #[clap(flatten)]
        query: QueryArgs,

        /// Number of scorers to show.
        #[clap(long, short = 'n', default_value_t = 10)]
        limit: u32,
    },

    /// Per-player rates (goals, assists, efficiency) for one team.
    Players {
        /// Local team id.
        #[clap(long, short)]
        team: TeamId,

        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Win rate and per-match averages for one team.
    TeamMetrics {
        /// Local team id.
        #[clap(long, short)]
        team: TeamId,

        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Per-match rates for every team of the season.
    Efficiency {
        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Recent results of a team (W/D/L), newest last.
    Form {
        /// Local team id.
        #[clap(long, short)]
        team: TeamId,

        /// Number of matches to include.
        #[clap(long, default_value_t = 5)]
        last: usize,

        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Compare teams on a normalized 0..1 scale (repeatable): `-t 1 -t 2`.
    Compare {
        #[clap(long = "team", short = 't', required = true)]
        teams: Vec<TeamId>,

        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Upcoming matches.
    Fixtures {
        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Recent results.
    Results {
        #[clap(flatten)]
        query: QueryArgs,
    },

    /// League overview: totals, leader, top scorer, squad make-up.
    Dashboard {
        #[clap(flatten)]
        query: QueryArgs,
    },

    /// Load the bundled La Liga 2024-25 sample into the database.
    Seed {
        /// Clear all stored data first.
        #[clap(long)]
        reset: bool,
    },
}

#[derive(Debug, Parser)]
#[clap(
    name = "football-analytics",
    about = "Football statistics from a local store and a live API",
    version
)]
pub struct FootballCli {
    #[clap(flatten)]
    pub engine: EngineArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare_with_repeated_teams() {
        let cli = FootballCli::try_parse_from([
            "football-analytics",
            "compare",
            "-t",
            "1",
            "-t",
            "3",
            "--season",
            "2024-25",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Compare { teams, query } => {
                assert_eq!(teams, vec![TeamId::new(1), TeamId::new(3)]);
                assert_eq!(query.season, Season::new(2024));
                assert!(query.json);
                assert!(query.league.is_none());
            }
            other => panic!("Expected Compare, got {:?}", other),
        }
    }

    #[test]
    fn test_compare_requires_a_team() {
        assert!(FootballCli::try_parse_from(["football-analytics", "compare"]).is_err());
    }

    #[test]
    fn test_global_engine_flags_after_subcommand() {
        let cli = FootballCli::try_parse_from([
            "football-analytics",
            "standings",
            "--league",
            "pl",
            "--db",
            "/tmp/f.db",
            "--fail-fast",
        ])
        .unwrap();

        assert_eq!(cli.engine.db, Some(PathBuf::from("/tmp/f.db")));
        assert!(cli.engine.fail_fast);
        match cli.command {
            Commands::Standings { query } => {
                assert_eq!(query.league.map(|l| l.to_string()), Some("PL".to_string()))
            }
            other => panic!("Expected Standings, got {:?}", other),
        }
    }

    #[test]
    fn test_form_defaults() {
        let cli =
            FootballCli::try_parse_from(["football-analytics", "form", "--team", "2"]).unwrap();
        match cli.command {
            Commands::Form { team, last, query } => {
                assert_eq!(team, TeamId::new(2));
                assert_eq!(last, 5);
                assert_eq!(query.season, Season::default());
            }
            other => panic!("Expected Form, got {:?}", other),
        }
    }
}
