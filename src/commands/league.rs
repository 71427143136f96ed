//! League-wide commands: standings, scorers, fixtures, results, dashboard.

use std::fmt::Write as _;

use super::common::{quality_notice, signed, to_json, CommandContext};
use crate::analytics::stats::Dashboard;
use crate::analytics::{DataQuality, Sourced};
use crate::api::{LiveMatch, StandingEntry, TopScorer};
use crate::cli::QueryArgs;
use crate::Result;

/// Handle the standings command
pub async fn handle_standings(ctx: &CommandContext, query: QueryArgs) -> Result<()> {
    let league = ctx.league(query.league);
    let table = ctx.stats.standings(&league, query.season).await?;

    if query.json {
        println!("{}", to_json(&table)?);
    } else {
        print!("{}", render_standings(&table));
    }
    Ok(())
}

/// Handle the top scorers command
pub async fn handle_top_scorers(ctx: &CommandContext, query: QueryArgs, limit: u32) -> Result<()> {
    let league = ctx.league(query.league);
    let scorers = ctx.stats.top_scorers(&league, query.season, limit).await?;

    if query.json {
        println!("{}", to_json(&scorers)?);
    } else {
        print!("{}", render_top_scorers(&scorers));
    }
    Ok(())
}

/// Handle the fixtures command
pub async fn handle_fixtures(ctx: &CommandContext, query: QueryArgs) -> Result<()> {
    let league = ctx.league(query.league);
    let fixtures = ctx.stats.fixtures(&league).await?;

    if query.json {
        println!("{}", to_json(&fixtures)?);
    } else {
        print!("{}", render_matches(&fixtures, "No upcoming matches."));
    }
    Ok(())
}

/// Handle the results command
pub async fn handle_results(ctx: &CommandContext, query: QueryArgs) -> Result<()> {
    let league = ctx.league(query.league);
    let results = ctx.stats.results(&league).await?;

    if query.json {
        println!("{}", to_json(&results)?);
    } else {
        print!("{}", render_matches(&results, "No recent results."));
    }
    Ok(())
}

/// Handle the dashboard command
pub async fn handle_dashboard(ctx: &CommandContext, query: QueryArgs) -> Result<()> {
    let league = ctx.league(query.league);
    let dashboard = ctx.stats.dashboard(&league, query.season).await?;

    if query.json {
        println!("{}", to_json(&dashboard)?);
    } else {
        print!("{}", render_dashboard(&dashboard));
    }
    Ok(())
}

fn notice_line(out: &mut String, quality: DataQuality) {
    if let Some(notice) = quality_notice(quality) {
        let _ = writeln!(out, "{notice}");
    }
}

pub fn render_standings(table: &Sourced<Vec<StandingEntry>>) -> String {
    let mut out = String::new();
    notice_line(&mut out, table.quality);

    if table.data.is_empty() {
        out.push_str("No standings available.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for e in &table.data {
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}",
            e.rank,
            e.team.display_name(),
            e.played,
            e.won,
            e.draw,
            e.lost,
            e.goals_for,
            e.goals_against,
            signed(i64::from(e.goal_difference)),
            e.points
        );
    }
    out
}

pub fn render_top_scorers(scorers: &Sourced<Vec<TopScorer>>) -> String {
    let mut out = String::new();
    notice_line(&mut out, scorers.quality);

    if scorers.data.is_empty() {
        out.push_str("No scorers found.\n");
        return out;
    }

    for (idx, s) in scorers.data.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<24} {:<20} {:>3} goals {:>3} assists {:>3} matches",
            idx + 1,
            s.player.name,
            s.team.display_name(),
            s.goals,
            s.assists,
            s.played_matches
        );
    }
    out
}

pub fn render_matches(matches: &Sourced<Vec<LiveMatch>>, empty: &str) -> String {
    let mut out = String::new();
    notice_line(&mut out, matches.quality);

    if matches.data.is_empty() {
        let _ = writeln!(out, "{empty}");
        return out;
    }

    for m in &matches.data {
        let when = m
            .kickoff
            .map(|k| k.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "TBD".to_string());
        let score = m
            .score
            .map(|s| format!("{} - {}", s.home, s.away))
            .unwrap_or_else(|| "vs".to_string());
        let _ = writeln!(
            out,
            "{when}  {:>22} {:^7} {:<22}",
            m.home_team.display_name(),
            score,
            m.away_team.display_name()
        );
    }
    out
}

pub fn render_dashboard(d: &Dashboard) -> String {
    let mut out = String::new();
    notice_line(&mut out, d.quality);

    let _ = writeln!(out, "{} {}", d.league, d.season);
    let _ = writeln!(
        out,
        "Teams: {}  Players: {}  Goals: {}  Assists: {}",
        d.summary.teams, d.summary.players, d.summary.total_goals, d.summary.total_assists
    );
    if let Some(leader) = &d.leader {
        let _ = writeln!(
            out,
            "Leader: {} ({} pts)",
            leader.team.display_name(),
            leader.points
        );
    }
    if let Some(scorer) = &d.top_scorer {
        let _ = writeln!(
            out,
            "Top scorer: {} ({} goals)",
            scorer.player.name, scorer.goals
        );
    }

    if !d.positions.is_empty() {
        out.push_str("By position:\n");
        for p in &d.positions {
            let _ = writeln!(
                out,
                "  {:<12} {:>3} players {:>4} goals {:>4} assists",
                p.position.as_str(),
                p.players,
                p.goals,
                p.assists
            );
        }
    }
    if !d.nationalities.is_empty() {
        out.push_str("By nationality:\n");
        for n in &d.nationalities {
            let _ = writeln!(out, "  {:<12} {:>3} players {:>4} goals", n.nationality, n.players, n.goals);
        }
    }
    out
}
