//! Team-level commands: player rates, team metrics, efficiency table, form.

use std::fmt::Write as _;

use super::common::{percent, signed, to_json, CommandContext};
use crate::analytics::{PlayerMetrics, TeamForm, TeamMetrics};
use crate::cli::QueryArgs;
use crate::{Result, TeamId};

/// Handle the players command
pub async fn handle_players(ctx: &CommandContext, team: TeamId, query: QueryArgs) -> Result<()> {
    let metrics = ctx.stats.player_metrics(team, query.season).await?;

    if query.json {
        println!("{}", to_json(&metrics)?);
    } else {
        print!("{}", render_player_metrics(&metrics));
    }
    Ok(())
}

/// Handle the team metrics command
pub async fn handle_team_metrics(ctx: &CommandContext, team: TeamId, query: QueryArgs) -> Result<()> {
    let metrics = ctx.stats.team_metrics(team, query.season).await?;

    if query.json {
        println!("{}", to_json(&metrics)?);
    } else {
        print!("{}", render_team_metrics(std::slice::from_ref(&metrics)));
    }
    Ok(())
}

/// Handle the efficiency command
pub async fn handle_efficiency(ctx: &CommandContext, query: QueryArgs) -> Result<()> {
    let table = ctx.stats.efficiency_table(query.season).await?;

    if query.json {
        println!("{}", to_json(&table)?);
    } else if table.is_empty() {
        println!("No teams stored for {}.", query.season);
    } else {
        print!("{}", render_team_metrics(&table));
    }
    Ok(())
}

/// Handle the form command
pub async fn handle_form(
    ctx: &CommandContext,
    team: TeamId,
    last: usize,
    query: QueryArgs,
) -> Result<()> {
    let form = ctx.stats.team_form(team, query.season, last).await?;

    if query.json {
        println!("{}", to_json(&form)?);
    } else {
        println!("{}", render_form(&form));
    }
    Ok(())
}

pub fn render_player_metrics(metrics: &[PlayerMetrics]) -> String {
    if metrics.is_empty() {
        return "No players stored for this team.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<11} {:>3} {:>3} {:>3} {:>6} {:>6} {:>6} {:>8}",
        "Player", "Position", "MP", "G", "A", "G/MP", "A/MP", "Eff", "Min/G"
    );
    for m in metrics {
        let minutes_per_goal = m
            .minutes_per_goal
            .map(|v| format!("{v:.0}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<24} {:<11} {:>3} {:>3} {:>3} {:>6.2} {:>6.2} {:>6.2} {:>8}",
            m.name,
            m.position.as_str(),
            m.matches,
            m.goals,
            m.assists,
            m.goals_per_match,
            m.assists_per_match,
            m.efficiency,
            minutes_per_goal
        );
    }
    out
}

pub fn render_team_metrics(metrics: &[TeamMetrics]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>3} {:>4} {:>7} {:>5} {:>5} {:>6} {:>5}",
        "Team", "MP", "Pts", "Win%", "GF/MP", "GA/MP", "Pts/MP", "GD"
    );
    for m in metrics {
        let _ = writeln!(
            out,
            "{:<24} {:>3} {:>4} {:>7} {:>5.2} {:>5.2} {:>6.2} {:>5}",
            m.name,
            m.matches_played,
            m.points,
            percent(m.win_rate),
            m.avg_goals_for,
            m.avg_goals_against,
            m.points_per_match,
            signed(m.goal_difference)
        );
    }
    out
}

pub fn render_form(form: &TeamForm) -> String {
    if form.results.is_empty() {
        return format!("Team {}: no matches stored for {}", form.team_id, form.season);
    }
    format!(
        "Team {} form ({}): {} ({} pts from {} matches)",
        form.team_id,
        form.season,
        form.form,
        form.points,
        form.results.len()
    )
}
