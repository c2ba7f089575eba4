use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tourney_engine::adapters::{csv_export, roster_file};
use tourney_engine::app::simulation;
use tourney_engine::config::cli::Command;
use tourney_engine::utils::error::ErrorSeverity;
use tourney_engine::utils::logger;
use tourney_engine::utils::validation::{validate_path, Validate};
use tourney_engine::{
    Cli, EngineConfig, EngineError, EventId, EventStages, MemoryStore, TournamentEngine,
    TournamentService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting tourney");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let result = match &cli.command {
        Command::Plan { roster, config } => plan(roster, config.as_deref()),
        Command::Simulate {
            roster,
            config,
            output,
        } => simulate(roster, config.as_deref(), output).await,
    };

    if let Err(e) = result {
        if let Some(engine_error) = e.downcast_ref::<EngineError>() {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                engine_error,
                engine_error.category(),
                engine_error.severity()
            );
            eprintln!("❌ {}", engine_error.user_friendly_message());
            eprintln!("💡 {}", engine_error.recovery_suggestion());

            let exit_code = match engine_error.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            return Ok(());
        }
        return Err(e);
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn plan(roster_path: &str, config_path: Option<&str>) -> anyhow::Result<()> {
    validate_path("roster", roster_path)?;
    let config = load_config(config_path)?;
    let roster = roster_file::load_roster(roster_path)
        .with_context(|| format!("failed to load roster '{}'", roster_path))?;
    let engine = TournamentEngine::new(config);

    let stages = engine.form_groups(&roster, &EventStages::new(EventId(1)))?;
    let name_of = |id: &tourney_engine::EntrantId| {
        roster
            .iter()
            .find(|e| e.id == *id)
            .map(|e| format!("{} ({})", e.name, e.rating))
            .unwrap_or_else(|| id.to_string())
    };

    println!("{} entrants, {} groups", roster.len(), stages.groups.len());
    for group in &stages.groups {
        println!("\nGroup {}", group.index + 1);
        for member in &group.members {
            println!("  {}", name_of(member));
        }
        println!("  {} fixtures", group.fixtures.len());
    }

    match engine.preview_knockout(roster.len()) {
        Some((cut, byes, matches)) => {
            println!("\nKnockout round 1");
            if cut > 0 {
                println!("  pre-cut: {} entrants removed", cut);
            }
            println!("  {} matches, {} byes", matches, byes);
        }
        None => println!("\nNot enough entrants for a knockout stage"),
    }
    Ok(())
}

async fn simulate(roster_path: &str, config_path: Option<&str>, output: &str) -> anyhow::Result<()> {
    validate_path("roster", roster_path)?;
    validate_path("output", output)?;
    let config = load_config(config_path)?;
    let roster = roster_file::load_roster(roster_path)
        .with_context(|| format!("failed to load roster '{}'", roster_path))?;

    let store = MemoryStore::new();
    let service = TournamentService::new(store.clone(), store, TournamentEngine::new(config));
    let event = EventId(1);

    let report = simulation::simulate(&service, event, roster).await?;
    let stages = service.stages(event).await?;
    let final_roster = service.roster(event).await?;

    let fixtures_path = Path::new(output).join("fixtures.csv");
    let ratings_path = Path::new(output).join("ratings.json");
    csv_export::export_fixtures(&fixtures_path, &stages, &final_roster)?;
    roster_file::save_ratings(&ratings_path, &report.commit)?;

    let champion = final_roster
        .iter()
        .find(|e| e.id == report.champion)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| report.champion.to_string());

    tracing::info!("✅ Simulation completed");
    println!("✅ Champion: {}", champion);
    println!(
        "   {} groups / {} group fixtures, {} knockout rounds / {} knockout fixtures",
        report.groups, report.group_fixtures, report.knockout_rounds, report.knockout_fixtures
    );
    for milestone in &report.commit.milestones {
        println!("   🏅 {} reached elite at {}", milestone.entrant, milestone.rating);
    }
    println!("📁 Fixtures saved to: {}", fixtures_path.display());
    println!("📁 Ratings saved to: {}", ratings_path.display());
    Ok(())
}
