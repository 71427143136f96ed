//! Team comparison command implementation

use std::fmt::Write as _;

use super::common::{to_json, CommandContext};
use crate::analytics::{Axis, Comparison};
use crate::cli::QueryArgs;
use crate::{Result, TeamId};

/// Handle the compare command
pub async fn handle_compare(ctx: &CommandContext, teams: Vec<TeamId>, query: QueryArgs) -> Result<()> {
    let comparison = ctx.comparison.compare(&teams, query.season).await?;

    if query.json {
        println!("{}", to_json(&comparison)?);
    } else {
        print!("{}", render_comparison(&comparison));
    }
    Ok(())
}

/// One row per team; each cell shows the normalized value and the raw one.
pub fn render_comparison(comparison: &Comparison) -> String {
    if comparison.is_empty() {
        return "No teams to compare.\n".to_string();
    }

    let mut out = String::new();
    let _ = write!(out, "{:<24}", "Team");
    for axis in Axis::ALL {
        let _ = write!(out, " {:>16}", axis.label());
    }
    out.push('\n');

    for vector in &comparison.teams {
        let _ = write!(out, "{:<24}", vector.name);
        for axis in Axis::ALL {
            let raw = vector.raw.get(axis);
            let raw = if axis == Axis::WinRate {
                format!("{:.2}", raw)
            } else {
                format!("{raw}")
            };
            let cell = format!("{:.2} ({raw})", vector.normalized.get(axis));
            let _ = write!(out, " {:>16}", cell);
        }
        out.push('\n');
    }
    out
}
