//! Headless Viking arena runner.
//!
//! This binary plays tournaments without graphics and prints JSON reports.
//! Designed for balance testing, CI determinism checks, and economy runs.
//!
//! # Usage
//!
//! ```bash
//! # Play one tournament and print its report
//! cargo run -p arena_headless -- run --seed 7
//!
//! # Run batch balance test
//! cargo run -p arena_headless -- batch --count 1000 --output results/
//!
//! # Verify determinism
//! cargo run -p arena_headless -- verify --seed 12345 --runs 5
//!
//! # Play ten tournaments on one account
//! cargo run -p arena_headless -- session --tournaments 10 --cash-out
//! ```
//!
//! Output (stdout): JSON reports
//! Logs (stderr): Debug information

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_core::config::ArenaConfig;
use arena_headless::{
    batch::{run_batch, BatchConfig},
    pilot::Pilot,
    runner::{run_tournament, RunConfig, DEFAULT_MAX_TICKS_PER_MATCH},
    session::{run_session, SessionConfig},
    verify_determinism,
};

#[derive(Parser)]
#[command(name = "arena_headless")]
#[command(about = "Headless Viking arena runner for balance testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Arena config file (RON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single tournament
    Run {
        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Pilot for the human seat (autopilot, idle)
        #[arg(short, long, default_value = "autopilot")]
        pilot: String,

        /// Ticks a match may last before the run is abandoned (0 = unlimited)
        #[arg(long, default_value_t = DEFAULT_MAX_TICKS_PER_MATCH)]
        max_ticks: u64,
    },

    /// Run batch of tournaments for balance testing
    Batch {
        /// Number of tournaments to run
        #[arg(short = 'n', long, default_value = "100")]
        count: u32,

        /// Starting random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Maximum parallel runs (0 = auto)
        #[arg(short = 'j', long, default_value = "0")]
        parallel: usize,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Pilot for the human seat (autopilot, idle)
        #[arg(short, long, default_value = "autopilot")]
        pilot: String,

        /// Ticks a match may last before the run is abandoned (0 = unlimited)
        #[arg(long, default_value_t = DEFAULT_MAX_TICKS_PER_MATCH)]
        max_ticks: u64,
    },

    /// Verify determinism by running same seed multiple times
    Verify {
        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Play several tournaments on one player account
    Session {
        /// Seed for the first tournament
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Tournaments to attempt
        #[arg(short, long, default_value = "10")]
        tournaments: u32,

        /// Tournaments per in-game day
        #[arg(long, default_value = "3")]
        per_day: u32,

        /// Never watch ads for free games
        #[arg(long)]
        no_ads: bool,

        /// Withdraw winnings at the end
        #[arg(long)]
        cash_out: bool,

        /// Opening cash in cents
        #[arg(long, default_value = "0")]
        starting_cash: u64,

        /// Pilot for the human seat (autopilot, idle)
        #[arg(short, long, default_value = "autopilot")]
        pilot: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for reports)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let arena = load_config(cli.config.as_ref());

    match cli.command {
        Some(Commands::Run {
            seed,
            pilot,
            max_ticks,
        }) => cmd_run(&arena, seed, &pilot, max_ticks),
        Some(Commands::Batch {
            count,
            seed,
            parallel,
            output,
            pilot,
            max_ticks,
        }) => cmd_batch(&arena, count, seed, parallel, output, &pilot, max_ticks),
        Some(Commands::Verify { seed, runs }) => cmd_verify(&arena, seed, runs),
        Some(Commands::Session {
            seed,
            tournaments,
            per_day,
            no_ads,
            cash_out,
            starting_cash,
            pilot,
        }) => {
            let config = SessionConfig {
                seed,
                tournaments,
                tournaments_per_day: per_day,
                watch_ads_when_broke: !no_ads,
                cash_out,
                starting_cash_cents: starting_cash,
                pilot: parse_pilot(&pilot),
                arena,
            };
            cmd_session(&config);
        }
        None => {
            // Default: one tournament with seed 0
            cmd_run(&arena, 0, "autopilot", DEFAULT_MAX_TICKS_PER_MATCH);
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> ArenaConfig {
    let Some(path) = path else {
        return ArenaConfig::default();
    };
    match ArenaConfig::load(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Loaded arena config");
            config
        }
        Err(e) => fail(&e),
    }
}

fn parse_pilot(name: &str) -> Pilot {
    Pilot::by_name(name).unwrap_or_else(|| {
        tracing::warn!(pilot = name, "Unknown pilot, using autopilot");
        Pilot::Autopilot
    })
}

fn fail(error: &dyn std::fmt::Display) -> ! {
    tracing::error!(error = %error, "Command failed");
    eprintln!("FATAL: {error}");
    std::process::exit(1);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(&e),
    }
}

/// Play a single tournament
fn cmd_run(arena: &ArenaConfig, seed: u64, pilot: &str, max_ticks: u64) {
    let config = RunConfig {
        seed,
        tournament: arena.tournament.clone(),
        pilot: parse_pilot(pilot),
        max_ticks_per_match: max_ticks,
    };

    match run_tournament(&config) {
        Ok(report) => {
            print_json(&report);
            if report.stalled {
                std::process::exit(2);
            }
        }
        Err(e) => fail(&e),
    }
}

/// Run batch of tournaments for balance testing
fn cmd_batch(
    arena: &ArenaConfig,
    count: u32,
    seed: u64,
    parallel: usize,
    output: PathBuf,
    pilot: &str,
    max_ticks: u64,
) {
    let config = BatchConfig {
        count,
        seed_start: seed,
        parallel,
        tournament: arena.tournament.clone(),
        pilot: parse_pilot(pilot),
        max_ticks_per_match: max_ticks,
        output_dir: output.clone(),
    };

    let results = run_batch(&config);

    let results_path = output.join("batch_results.json");
    if let Err(e) = results.save(&results_path) {
        tracing::error!(error = %e, path = %results_path.display(), "Failed to save results");
        fail(&e);
    }

    let summary = &results.summary;
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BATCH COMPLETE");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Tournaments completed: {}", summary.completed);
    if summary.stalled > 0 {
        eprintln!("Tournaments stalled: {}", summary.stalled);
    }
    if !results.errors.is_empty() {
        eprintln!("Errors: {}", results.errors.len());
    }
    eprintln!("Duration: {:.1}s", results.duration_seconds);
    eprintln!("\nChampions by weapon:");
    for (weapon, wins) in &summary.champions_by_weapon {
        eprintln!(
            "  {:<8} {:>6} ({:>5.1}%)",
            weapon,
            wins,
            summary.weapon_share(weapon) * 100.0
        );
    }
    eprintln!("Human win rate: {:.1}%", summary.human_win_rate * 100.0);
    eprintln!("Avg ticks per tournament: {:.0}", summary.avg_ticks);
    eprintln!("\nResults saved to: {}", results_path.display());

    print_json(summary);
}

/// Verify determinism by running same seed multiple times
fn cmd_verify(arena: &ArenaConfig, seed: u64, runs: u32) {
    tracing::info!("Verifying determinism: seed {} ({} runs)", seed, runs);

    let config = RunConfig {
        seed,
        tournament: arena.tournament.clone(),
        ..RunConfig::default()
    };

    match verify_determinism(&config, runs) {
        Ok(true) => eprintln!("PASS: All {runs} runs produced identical results"),
        Ok(false) => {
            eprintln!("FAIL: Non-determinism detected!");
            std::process::exit(1);
        }
        Err(e) => fail(&e),
    }
}

/// Play several tournaments on one account
fn cmd_session(config: &SessionConfig) {
    match run_session(config) {
        Ok(report) => {
            eprintln!(
                "Session: {} entries, {} titles, cash ${}.{:02}",
                report.entries.len(),
                report.titles(),
                report.cash_cents / 100,
                report.cash_cents % 100
            );
            print_json(&report);
        }
        Err(e) => fail(&e),
    }
}
