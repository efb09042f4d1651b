//! Single tournament runner.
//!
//! Plays one seeded tournament to completion without rendering: stage a
//! fight, step it with the pilot's input until it resolves, repeat.

use arena_core::combatant::{Combatant, EntrantId};
use arena_core::config::TournamentConfig;
use arena_core::tournament::{FightStatus, MatchTick, Tournament};
use arena_core::weapons::WeaponKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::pilot::{Pilot, PilotExecutor};

/// Default per-match tick guard (about 10 minutes at 60 ticks per second).
pub const DEFAULT_MAX_TICKS_PER_MATCH: u64 = 36_000;

/// Configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Random seed.
    pub seed: u64,
    /// Tournament setup.
    pub tournament: TournamentConfig,
    /// Input source for the human seat.
    pub pilot: Pilot,
    /// Ticks a match may run before the run is abandoned (0 = unlimited).
    pub max_ticks_per_match: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tournament: TournamentConfig::default(),
            pilot: Pilot::default(),
            max_ticks_per_match: DEFAULT_MAX_TICKS_PER_MATCH,
        }
    }
}

impl RunConfig {
    /// Default run with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Set the pilot.
    pub fn with_pilot(mut self, pilot: Pilot) -> Self {
        self.pilot = pilot;
        self
    }

    /// Set the tournament setup.
    pub fn with_tournament(mut self, tournament: TournamentConfig) -> Self {
        self.tournament = tournament;
        self
    }
}

/// One played match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Zero-based round index.
    pub round: usize,
    /// Entrant staged on the left.
    pub left: EntrantId,
    /// Entrant staged on the right.
    pub right: EntrantId,
    /// Survivor (None if the match stalled).
    pub winner: Option<EntrantId>,
    /// Ticks the match lasted.
    pub ticks: u64,
}

/// The crowned entrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionRecord {
    /// Roster id.
    pub id: EntrantId,
    /// Display name.
    pub name: String,
    /// Weapon carried.
    pub weapon: WeaponKind,
    /// Whether the human seat won.
    pub human: bool,
    /// Health left after the final.
    pub health: u32,
}

impl ChampionRecord {
    fn of(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id(),
            name: combatant.name().to_string(),
            weapon: combatant.weapon().kind,
            human: combatant.is_human(),
            health: combatant.health(),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Seed used.
    pub seed: u64,
    /// Pilot used for the human seat.
    pub pilot: String,
    /// Champion, if one was crowned.
    pub champion: Option<ChampionRecord>,
    /// Matches in play order.
    pub matches: Vec<MatchRecord>,
    /// Total ticks stepped.
    pub total_ticks: u64,
    /// Prize pool in cents.
    pub prize_pool_cents: u64,
    /// Whether a match hit the tick guard.
    pub stalled: bool,
    /// Final tournament state hash.
    pub final_state_hash: u64,
}

impl TournamentReport {
    /// Whether the human seat took the title.
    #[must_use]
    pub fn human_won(&self) -> bool {
        self.champion.as_ref().is_some_and(|c| c.human)
    }
}

/// Play one tournament to completion.
///
/// # Errors
/// Fails when the tournament config is rejected.
pub fn run_tournament(config: &RunConfig) -> Result<TournamentReport> {
    let mut tournament = Tournament::seeded(&config.tournament, config.seed)?;
    Ok(play(&mut tournament, config))
}

/// Play an already-built tournament with the configured pilot.
pub(crate) fn play(tournament: &mut Tournament, config: &RunConfig) -> TournamentReport {
    let mut pilot = PilotExecutor::new(config.pilot.clone());
    let mut matches = Vec::new();
    let mut stalled = false;

    info!(seed = config.seed, pilot = config.pilot.name(), "Tournament run starting");

    while let FightStatus::Active(pairing) = tournament.start_next_fight() {
        let round = tournament.current_round();
        let start_tick = tournament.tick();
        let mut winner = None;

        loop {
            let intent = pilot.next_intent(&*tournament);
            match tournament.step(intent) {
                MatchTick::Ongoing => {}
                MatchTick::Resolved { winner: w, .. } => {
                    winner = Some(w);
                    break;
                }
                MatchTick::Idle => break,
            }
            let elapsed = tournament.tick() - start_tick;
            if config.max_ticks_per_match > 0 && elapsed >= config.max_ticks_per_match {
                warn!(
                    round,
                    left = pairing.left,
                    right = pairing.right,
                    ticks = elapsed,
                    "Match stalled"
                );
                stalled = true;
                break;
            }
        }

        let ticks = tournament.tick() - start_tick;
        debug!(round, left = pairing.left, right = pairing.right, ?winner, ticks, "Match finished");
        matches.push(MatchRecord {
            round,
            left: pairing.left,
            right: pairing.right,
            winner,
            ticks,
        });

        if stalled {
            break;
        }
    }

    let champion = tournament.champion().map(ChampionRecord::of);
    if let Some(c) = &champion {
        info!(
            champion = %c.name,
            weapon = c.weapon.name(),
            human = c.human,
            ticks = tournament.tick(),
            "Tournament run complete"
        );
    }

    TournamentReport {
        seed: config.seed,
        pilot: config.pilot.name().to_string(),
        champion,
        matches,
        total_ticks: tournament.tick(),
        prize_pool_cents: tournament.prize_pool_cents(),
        stalled,
        final_state_hash: tournament.state_hash(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::combatant::InputIntent;

    #[test]
    fn test_run_plays_every_match() {
        let report = run_tournament(&RunConfig::new(7)).unwrap();
        assert!(!report.stalled);
        assert_eq!(report.matches.len(), 7);
        assert!(report.champion.is_some());
        assert!(report.matches.iter().all(|m| m.winner.is_some()));
        assert_eq!(report.prize_pool_cents, 8_000);
        let finals: Vec<&MatchRecord> = report.matches.iter().filter(|m| m.round == 2).collect();
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].winner, report.champion.as_ref().map(|c| c.id));
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = run_tournament(&RunConfig::new(3)).unwrap();
        let b = run_tournament(&RunConfig::new(3)).unwrap();
        assert_eq!(a.final_state_hash, b.final_state_hash);
        assert_eq!(a.matches, b.matches);
    }

    #[test]
    fn test_idle_pilot_never_wins() {
        for seed in 0..5 {
            let report = run_tournament(&RunConfig::new(seed).with_pilot(Pilot::Idle)).unwrap();
            assert!(!report.human_won());
        }
    }

    #[test]
    fn test_scripted_walk_away_still_resolves() {
        let retreat = vec![InputIntent::step(-10); 50];
        let report =
            run_tournament(&RunConfig::new(5).with_pilot(Pilot::Scripted(retreat))).unwrap();
        assert!(!report.stalled);
        assert!(report.champion.is_some());
    }

    #[test]
    fn test_tick_guard_marks_stall() {
        let config = RunConfig {
            max_ticks_per_match: 3,
            ..RunConfig::new(1)
        };
        let report = run_tournament(&config).unwrap();
        assert!(report.stalled);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].winner, None);
        assert!(report.champion.is_none());
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let config = RunConfig::new(0).with_tournament(TournamentConfig {
            entrant_count: 5,
            ..TournamentConfig::default()
        });
        assert!(run_tournament(&config).is_err());
    }
}
