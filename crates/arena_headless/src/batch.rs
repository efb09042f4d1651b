//! Batch tournament runner for balance testing.
//!
//! Runs many seeds in parallel using rayon and summarizes who took the
//! title: champion counts by weapon and how often the human seat won.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arena_core::config::TournamentConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::pilot::Pilot;
use crate::runner::{run_tournament, RunConfig, TournamentReport, DEFAULT_MAX_TICKS_PER_MATCH};

/// Configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of tournaments to run
    pub count: u32,
    /// Starting seed; run `i` uses `seed_start + i`
    pub seed_start: u64,
    /// Maximum parallel runs (0 = use rayon default)
    pub parallel: usize,
    /// Tournament setup shared by every run
    pub tournament: TournamentConfig,
    /// Input source for the human seat
    pub pilot: Pilot,
    /// Per-match tick guard (0 = unlimited)
    pub max_ticks_per_match: u64,
    /// Output directory for results
    pub output_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed_start: 0,
            parallel: 0,
            tournament: TournamentConfig::default(),
            pilot: Pilot::Autopilot,
            max_ticks_per_match: DEFAULT_MAX_TICKS_PER_MATCH,
            output_dir: PathBuf::from("results"),
        }
    }
}

impl BatchConfig {
    /// Create config for `count` runs.
    pub fn new(count: u32) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// Set seed start
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set output directory
    pub fn with_output(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    fn run_config(&self, seed: u64) -> RunConfig {
        RunConfig {
            seed,
            tournament: self.tournament.clone(),
            pilot: self.pilot.clone(),
            max_ticks_per_match: self.max_ticks_per_match,
        }
    }
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Runs that crowned a champion.
    pub completed: u32,
    /// Runs abandoned at the tick guard.
    pub stalled: u32,
    /// Champions per weapon name.
    pub champions_by_weapon: BTreeMap<String, u32>,
    /// Titles taken by the human seat.
    pub human_wins: u32,
    /// `human_wins / completed` (0 when nothing completed).
    pub human_win_rate: f64,
    /// Mean ticks per completed run.
    pub avg_ticks: f64,
}

impl BatchSummary {
    /// Summarize `reports`.
    #[must_use]
    pub fn from_reports(reports: &[TournamentReport]) -> Self {
        let mut summary = Self::default();
        let mut total_ticks = 0u64;

        for report in reports {
            if report.stalled {
                summary.stalled += 1;
                continue;
            }
            let Some(champion) = &report.champion else {
                continue;
            };
            summary.completed += 1;
            total_ticks += report.total_ticks;
            *summary
                .champions_by_weapon
                .entry(champion.weapon.name().to_string())
                .or_insert(0) += 1;
            if champion.human {
                summary.human_wins += 1;
            }
        }

        if summary.completed > 0 {
            summary.human_win_rate = f64::from(summary.human_wins) / f64::from(summary.completed);
            summary.avg_ticks = total_ticks as f64 / f64::from(summary.completed);
        }
        summary
    }

    /// Champion share for `weapon` (0.0 to 1.0).
    #[must_use]
    pub fn weapon_share(&self, weapon: &str) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        f64::from(self.champions_by_weapon.get(weapon).copied().unwrap_or(0))
            / f64::from(self.completed)
    }
}

/// Error during batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Seed used
    pub seed: u64,
    /// Error message
    pub message: String,
}

/// Results from a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used
    pub config: BatchConfig,
    /// Individual run reports, in seed order
    pub reports: Vec<TournamentReport>,
    /// Aggregate summary
    pub summary: BatchSummary,
    /// Total runtime
    pub duration_seconds: f64,
    /// Errors encountered
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Run a batch of tournaments
pub fn run_batch(config: &BatchConfig) -> BatchResults {
    let start = Instant::now();
    info!(
        count = config.count,
        seed_start = config.seed_start,
        pilot = config.pilot.name(),
        "Starting batch run"
    );

    let seeds: Vec<u64> = (0..u64::from(config.count))
        .map(|i| config.seed_start.wrapping_add(i))
        .collect();

    let run_all = || -> Vec<(u64, crate::error::Result<TournamentReport>)> {
        seeds
            .par_iter()
            .map(|&seed| (seed, run_tournament(&config.run_config(seed))))
            .collect()
    };

    let outcomes = if config.parallel > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel)
            .build()
        {
            Ok(pool) => pool.install(run_all),
            Err(e) => {
                warn!(error = %e, "Failed to build thread pool, using global pool");
                run_all()
            }
        }
    } else {
        run_all()
    };

    let mut reports = Vec::with_capacity(outcomes.len());
    let mut errors = Vec::new();
    for (seed, outcome) in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => errors.push(BatchError {
                seed,
                message: e.to_string(),
            }),
        }
    }

    let summary = BatchSummary::from_reports(&reports);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        completed = summary.completed,
        stalled = summary.stalled,
        errors = errors.len(),
        human_win_rate = summary.human_win_rate,
        duration_secs = duration_seconds,
        "Batch run finished"
    );

    BatchResults {
        config: config.clone(),
        reports,
        summary,
        duration_seconds,
        errors,
    }
}
