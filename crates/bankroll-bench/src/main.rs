use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bankroll_bench::config::{ResolvedOutputs, SimulationConfig};
use bankroll_bench::logging::init_logging;
use bankroll_bench::table::TableRunner;

/// Seeded table simulator for the bankroll agent.
#[derive(Debug, Parser)]
#[command(
    name = "bankroll-bench",
    author,
    version,
    about = "Deterministic betting-table simulator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of hands to play.
    #[arg(long, value_name = "HANDS")]
    hands: Option<usize>,

    /// Override the RNG seed for dealing and agent streams.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no hands are played).
    #[arg(long)]
    validate_only: bool,

    /// Log every opponent's history with each decision (forces BKR_DECISION_DETAILS behavior).
    #[arg(long)]
    log_decision_details: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(hands) = cli.hands {
        config.table.hands = hands;
    }

    if let Some(seed) = cli.seed {
        config.table.seed = Some(seed);
    }

    if cli.log_decision_details {
        config.logging.decision_details = true;
    }

    config
        .validate()
        .with_context(|| format!("validating {}", cli.config.display()))?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let seat_count = config.seats.len();
    let run_id = config.run_id.clone();
    let hands = config.table.hands;

    println!(
        "Loaded configuration '{run_id}' with {seat_count} seat{} ({hands} hands)",
        if seat_count == 1 { "" } else { "s" }
    );

    let runner = TableRunner::new(config.clone(), outputs.clone())?;

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} hands → {} rows at {}",
        summary.hands_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for record in &summary.final_banks {
        println!("  {:<16} {:>10}", record.participant.as_str(), record.balance);
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
