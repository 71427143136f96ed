//! Unit tests for command helpers and renderers

use super::*;
use crate::analytics::comparison::compare_teams;
use crate::analytics::{compute_player_metrics, DataQuality, Sourced};
use crate::api::{StandingEntry, TeamRef};
use crate::storage::{FootballDatabase, Player, PlayerSeasonStats};
use crate::{LeagueCode, PlayerId, Position, Season, TeamId};
use std::path::PathBuf;

fn engine_args() -> EngineArgs {
    EngineArgs {
        db: None,
        api_url: None,
        ttl: None,
        fail_fast: false,
    }
}

fn entry(rank: u32, name: &str, goal_difference: i32) -> StandingEntry {
    StandingEntry {
        rank,
        team: TeamRef {
            id: rank,
            name: name.to_string(),
            short_name: None,
            tla: None,
        },
        points: 60 - rank,
        goal_difference,
        played: 28,
        won: 18,
        draw: 6,
        lost: 4,
        goals_for: 50,
        goals_against: 30,
        team_id: None,
    }
}

#[test]
fn test_apply_engine_args_overrides_only_given_values() {
    let base = EngineConfig::default().with_database_path("/data/base.db");

    let untouched = apply_engine_args(base.clone(), &engine_args());
    assert_eq!(untouched, base);

    let args = EngineArgs {
        db: Some(PathBuf::from("/tmp/other.db")),
        api_url: Some("http://localhost:8080/v4".to_string()),
        ttl: Some(60),
        fail_fast: true,
    };
    let config = apply_engine_args(base, &args);
    assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
    assert_eq!(config.api.base_url, "http://localhost:8080/v4");
    assert_eq!(config.ttl.default, Duration::from_secs(60));
}

#[test]
fn test_render_standings_marks_degraded_data() {
    let table = Sourced::degraded(vec![entry(1, "Real Madrid", 36), entry(2, "Valencia CF", -3)]);
    let text = league::render_standings(&table);

    assert!(text.starts_with("⚠"));
    assert!(text.contains("Real Madrid"));
    assert!(text.contains("+36"));
    assert!(text.contains("-3"));
}

#[test]
fn test_render_standings_fresh_has_no_notice() {
    let table = Sourced {
        data: vec![entry(1, "Real Madrid", 36)],
        quality: DataQuality::Fresh,
        fetched_at: None,
    };
    let text = league::render_standings(&table);
    assert!(!text.contains('⚠'));
    assert!(text.lines().next().unwrap().contains("Pts"));

    let empty: Sourced<Vec<StandingEntry>> = Sourced::degraded(Vec::new());
    assert!(league::render_standings(&empty).contains("No standings available."));
}

#[test]
fn test_render_player_metrics_without_minutes() {
    let player = Player {
        id: PlayerId::new(6),
        team_id: TeamId::new(2),
        season: Season::new(2024),
        name: "Pedri".to_string(),
        position: Position::Midfielder,
        nationality: "Spain".to_string(),
        stats: PlayerSeasonStats {
            goals: 5,
            assists: 9,
            minutes: 0,
            matches: 24,
        },
    };
    let text = teams::render_player_metrics(&[compute_player_metrics(&player, &player.stats)]);

    let row = text.lines().nth(1).unwrap();
    assert!(row.starts_with("Pedri"));
    assert!(row.contains("midfielder"));
    assert!(row.trim_end().ends_with('-'));
    assert!(row.contains("0.58"));
}

#[test]
fn test_render_comparison_lists_teams_in_order() {
    let store = FootballDatabase::new_in_memory().unwrap();
    store.seed_sample_data().unwrap();
    let season = Season::new(2024);
    let teams = vec![
        store.get_team(TeamId::new(2), season).unwrap(),
        store.get_team(TeamId::new(1), season).unwrap(),
    ];

    let text = compare::render_comparison(&compare_teams(&teams, season));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Goals against"));
    assert!(lines[1].starts_with("FC Barcelona"));
    assert!(lines[2].starts_with("Real Madrid"));
    assert!(lines[2].contains("1.00 (65)"));

    assert_eq!(
        compare::render_comparison(&compare_teams(&[], season)),
        "No teams to compare.\n"
    );
}

#[test]
fn test_handle_seed_reset() {
    let store = FootballDatabase::new_in_memory().unwrap();

    assert!(seed::handle_seed(&store, false).unwrap());
    assert!(!seed::handle_seed(&store, false).unwrap());
    assert!(seed::handle_seed(&store, true).unwrap());
    assert_eq!(store.get_teams(Season::new(2024)).unwrap().len(), 10);
}

#[test]
fn test_command_context_seeds_new_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default()
        .with_database_path(dir.path().join("football.db"))
        .with_api(crate::config::ApiConfig::default().with_base_url("http://127.0.0.1:9"));

    let ctx = common::CommandContext::new(config, true).unwrap();
    assert!(ctx.store().has_season(Season::new(2024)).unwrap());
    assert_eq!(ctx.league(None), LeagueCode::new("PD"));
    assert_eq!(ctx.league(Some(LeagueCode::new("PL"))).as_str(), "PL");
}

#[test]
fn test_format_helpers() {
    assert_eq!(common::percent(20.0 / 28.0), "71.4%");
    assert_eq!(common::signed(0), "0");
    assert_eq!(common::signed(-4), "-4");
    assert_eq!(common::signed(12), "+12");
    assert!(common::quality_notice(DataQuality::Fresh).is_none());
    assert!(common::quality_notice(DataQuality::Stale).is_some());
}
