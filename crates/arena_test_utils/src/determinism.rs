//! Determinism testing utilities.
//!
//! A tournament must be a pure function of its seed and input stream:
//! batch statistics and `verify` runs compare whole-tournament replays, not
//! just a prefix of ticks. Sources of divergence to watch for:
//!
//! - **Floating-point math**: positions use [`arena_core::math::Fixed`].
//! - **Unseeded randomness**: every roll goes through
//!   [`arena_core::rng::RandomSource`].
//! - **Shared state**: replays on other threads must not see each other.

use std::thread;

use arena_core::combatant::{EntrantId, InputIntent};
use arena_core::config::TournamentConfig;
use arena_core::tournament::{FightStatus, MatchTick, Tournament};

/// How one replay of a seed ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplayOutcome {
    /// Ticks stepped across every match.
    pub ticks: u64,
    /// [`Tournament::state_hash`] once the bracket is exhausted.
    pub state_hash: u64,
    /// Champion id, if one was crowned.
    pub champion: Option<EntrantId>,
}

impl ReplayOutcome {
    /// Capture the outcome of a finished (or abandoned) tournament.
    #[must_use]
    pub fn of(tournament: &Tournament) -> Self {
        Self {
            ticks: tournament.tick(),
            state_hash: tournament.state_hash(),
            champion: tournament.champion().map(|c| c.id()),
        }
    }
}

/// Every replay of one seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Seed that was replayed.
    pub seed: u64,
    /// One outcome per replay, in run order.
    pub outcomes: Vec<ReplayOutcome>,
}

impl DeterminismResult {
    /// True when every replay ended identically.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.outcomes.windows(2).all(|w| w[0] == w[1])
    }

    /// Replays that differ from the first, with their run index.
    #[must_use]
    pub fn divergent(&self) -> Vec<(usize, ReplayOutcome)> {
        let Some(first) = self.outcomes.first() else {
            return Vec::new();
        };
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, outcome)| *outcome != first)
            .map(|(i, outcome)| (i, *outcome))
            .collect()
    }

    /// Assert that the replays agreed.
    ///
    /// # Panics
    ///
    /// Panics listing the first replay and every run that diverged from it.
    pub fn assert_deterministic(&self) {
        let divergent = self.divergent();
        if let (Some(first), false) = (self.outcomes.first(), divergent.is_empty()) {
            panic!(
                "Seed {} replays diverged ({} of {} runs)\n\
                 Run 0: {:?}\n\
                 Divergent: {:?}",
                self.seed,
                divergent.len(),
                self.outcomes.len(),
                first,
                divergent
            );
        }
    }
}

/// Advance a tournament by one host frame with idle input: stage the next
/// fight when nothing is staged, otherwise step the match.
///
/// Returns false once the tournament has finished.
pub fn idle_frame(tournament: &mut Tournament) -> bool {
    if tournament.active_match().is_none() {
        return matches!(tournament.start_next_fight(), FightStatus::Active(_));
    }
    tournament.step(InputIntent::IDLE) != MatchTick::Idle
}

/// Play `seed` under `config` to completion with an idle human seat.
///
/// # Panics
///
/// Panics if `config` is rejected.
#[must_use]
pub fn replay_idle(config: &TournamentConfig, seed: u64) -> ReplayOutcome {
    let mut tournament = Tournament::seeded(config, seed).expect("replay config is valid");
    while idle_frame(&mut tournament) {}
    ReplayOutcome::of(&tournament)
}

/// Replay `seed` on the default config `runs` times, one after another.
#[must_use]
pub fn verify_tournament_determinism(seed: u64, runs: usize) -> DeterminismResult {
    let config = TournamentConfig::default();
    DeterminismResult {
        seed,
        outcomes: (0..runs).map(|_| replay_idle(&config, seed)).collect(),
    }
}

/// Replay `seed` on `num_threads` threads at once.
///
/// # Panics
///
/// Panics if a replay thread panics.
#[must_use]
pub fn verify_parallel_tournaments(seed: u64, num_threads: usize) -> DeterminismResult {
    let config = TournamentConfig::default();
    let outcomes: Vec<ReplayOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_threads)
            .map(|_| scope.spawn(|| replay_idle(&config, seed)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("replay thread panicked"))
            .collect()
    });
    DeterminismResult { seed, outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(state_hash: u64) -> ReplayOutcome {
        ReplayOutcome {
            ticks: 100,
            state_hash,
            champion: Some(3),
        }
    }

    #[test]
    fn test_tournament_replay_matches() {
        let result = verify_tournament_determinism(42, 3);
        result.assert_deterministic();
        assert_eq!(result.outcomes.len(), 3);
        assert!(result.outcomes[0].ticks > 0);
        assert!(result.outcomes[0].champion.is_some());
    }

    #[test]
    fn test_parallel_tournaments_match() {
        let result = verify_parallel_tournaments(9, 4);
        result.assert_deterministic();
        assert_eq!(
            result.outcomes[0],
            replay_idle(&TournamentConfig::default(), 9)
        );
    }

    #[test]
    fn test_replay_idle_is_repeatable() {
        let a = replay_idle(&TournamentConfig::default(), 1);
        let b = replay_idle(&TournamentConfig::default(), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_divergent_lists_runs_that_differ_from_the_first() {
        let result = DeterminismResult {
            seed: 5,
            outcomes: vec![outcome(1), outcome(1), outcome(2)],
        };
        assert!(!result.is_deterministic());
        assert_eq!(result.divergent(), vec![(2, outcome(2))]);
    }

    #[test]
    fn test_empty_result_is_deterministic() {
        let result = DeterminismResult {
            seed: 0,
            outcomes: Vec::new(),
        };
        assert!(result.is_deterministic());
        result.assert_deterministic();
    }

    #[test]
    #[should_panic(expected = "replays diverged")]
    fn test_assert_deterministic_panics_on_divergence() {
        DeterminismResult {
            seed: 5,
            outcomes: vec![outcome(1), outcome(2)],
        }
        .assert_deterministic();
    }
}
