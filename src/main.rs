//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use football_analytics::{
    cli::{Commands, FootballCli},
    commands::{
        apply_engine_args,
        common::CommandContext,
        compare::handle_compare,
        league::{
            handle_dashboard, handle_fixtures, handle_results, handle_standings,
            handle_top_scorers,
        },
        seed::handle_seed,
        teams::{handle_efficiency, handle_form, handle_players, handle_team_metrics},
    },
    config::EngineConfig,
    storage::FootballDatabase,
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let app = FootballCli::parse();

    let config = EngineConfig::from_env().context("invalid configuration")?;
    let config = apply_engine_args(config, &app.engine);

    if let Commands::Seed { reset } = app.command {
        let store = FootballDatabase::open(&config.database_path).with_context(|| {
            format!("cannot open database at {}", config.database_path.display())
        })?;
        handle_seed(&store, reset)?;
        return Ok(());
    }

    let ctx = CommandContext::new(config, app.engine.fail_fast)
        .context("failed to initialize the analytics engine")?;

    match app.command {
        Commands::Standings { query } => handle_standings(&ctx, query).await?,
        Commands::TopScorers { query, limit } => handle_top_scorers(&ctx, query, limit).await?,
        Commands::Players { team, query } => handle_players(&ctx, team, query).await?,
        Commands::TeamMetrics { team, query } => handle_team_metrics(&ctx, team, query).await?,
        Commands::Efficiency { query } => handle_efficiency(&ctx, query).await?,
        Commands::Form { team, last, query } => handle_form(&ctx, team, last, query).await?,
        Commands::Compare { teams, query } => handle_compare(&ctx, teams, query).await?,
        Commands::Fixtures { query } => handle_fixtures(&ctx, query).await?,
        Commands::Results { query } => handle_results(&ctx, query).await?,
        Commands::Dashboard { query } => handle_dashboard(&ctx, query).await?,
        Commands::Seed { .. } => {}
    }

    Ok(())
}
