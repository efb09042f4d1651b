//! Single-elimination bracket.
//!
//! The bracket knows pairings, not health: callers pass an `is_alive`
//! lookup so the bracket can tell resolved matches from pending ones.
//!
//! # Lifecycle
//!
//! ```text
//! Building -> RoundActive <-> MatchActive -> RoundActive -> ... -> Finished
//! ```
//!
//! Round slot counts are fixed up front from the entrant count. Only the
//! opening round is paired at build time; each later round is paired from
//! the previous round's winners, in bracket order, once that round has no
//! pending matches left.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combatant::EntrantId;
use crate::error::{GameError, Result};
use crate::rng::RandomSource;

/// A pairing of two entrants. `left` starts on the left arena mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// Entrant staged on the left.
    pub left: EntrantId,
    /// Entrant staged on the right.
    pub right: EntrantId,
}

impl Match {
    /// Create a pairing.
    #[must_use]
    pub const fn new(left: EntrantId, right: EntrantId) -> Self {
        Self { left, right }
    }

    /// Whether `id` fights in this match.
    #[must_use]
    pub const fn involves(&self, id: EntrantId) -> bool {
        self.left == id || self.right == id
    }

    /// Both members still standing.
    pub fn is_pending(&self, is_alive: impl Fn(EntrantId) -> bool) -> bool {
        is_alive(self.left) && is_alive(self.right)
    }

    /// The sole survivor, if exactly one member is alive.
    pub fn winner(&self, is_alive: impl Fn(EntrantId) -> bool) -> Option<EntrantId> {
        match (is_alive(self.left), is_alive(self.right)) {
            (true, false) => Some(self.left),
            (false, true) => Some(self.right),
            _ => None,
        }
    }
}

/// Bracket lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracketPhase {
    /// Pairings are being drawn.
    Building,
    /// A round is open with no match in progress.
    RoundActive,
    /// A match has been handed out and not yet recorded.
    MatchActive,
    /// All rounds are done. Terminal.
    Finished,
}

/// Ordered rounds of pairings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bracket {
    rounds: Vec<Vec<Match>>,
    planned_sizes: Vec<usize>,
    current_round: usize,
    phase: BracketPhase,
}

impl Bracket {
    /// Shuffle `entrants` and pair them into the opening round.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidEntrantCount`] unless the field is a power of two
    /// of at least two entrants; [`GameError::DuplicateEntrant`] if an id
    /// appears twice.
    pub fn build<D: RandomSource>(entrants: &[EntrantId], dice: &mut D) -> Result<Self> {
        let count = entrants.len();
        if count < 2 || !count.is_power_of_two() {
            return Err(GameError::InvalidEntrantCount(count));
        }
        let mut sorted = entrants.to_vec();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(GameError::DuplicateEntrant(pair[0]));
        }

        let mut bracket = Self {
            rounds: Vec::new(),
            planned_sizes: Self::planned_round_sizes(count),
            current_round: 0,
            phase: BracketPhase::Building,
        };

        let mut seeded = entrants.to_vec();
        dice.shuffle(&mut seeded);

        bracket.rounds = bracket
            .planned_sizes
            .iter()
            .map(|&size| Vec::with_capacity(size))
            .collect();
        bracket.rounds[0] = pair_consecutive(&seeded);
        bracket.phase = BracketPhase::RoundActive;

        info!(
            entrants = count,
            rounds = bracket.planned_sizes.len(),
            "Bracket built"
        );
        Ok(bracket)
    }

    /// Match slots per round for a field of `entrant_count`.
    ///
    /// Each round holds half (rounded down) of the entrants feeding it:
    /// 8 entrants give `[4, 2, 1]`.
    #[must_use]
    pub fn planned_round_sizes(entrant_count: usize) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut remaining = entrant_count;
        while remaining >= 2 {
            sizes.push(remaining / 2);
            remaining /= 2;
        }
        sizes
    }

    /// All rounds. Rounds not yet reached are empty.
    #[must_use]
    pub fn rounds(&self) -> &[Vec<Match>] {
        &self.rounds
    }

    /// Pairings of round `index`, if it exists.
    #[must_use]
    pub fn round(&self, index: usize) -> Option<&[Match]> {
        self.rounds.get(index).map(Vec::as_slice)
    }

    /// Slot counts per round, fixed at build time.
    #[must_use]
    pub fn planned_sizes(&self) -> &[usize] {
        &self.planned_sizes
    }

    /// Number of rounds.
    #[must_use]
    pub fn round_count(&self) -> usize {
        self.planned_sizes.len()
    }

    /// Zero-based index of the round being played.
    #[must_use]
    pub const fn current_round(&self) -> usize {
        self.current_round
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn phase(&self) -> BracketPhase {
        self.phase
    }

    /// Whether the bracket reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == BracketPhase::Finished
    }

    /// Find the next match with both members alive.
    ///
    /// Walks the current round in order. A round with nothing pending closes,
    /// its winners are paired into the next round, and the search continues
    /// there. Returns `None` once every round is closed.
    pub fn next_pending(&mut self, is_alive: impl Fn(EntrantId) -> bool) -> Option<Match> {
        loop {
            if self.phase == BracketPhase::Finished {
                return None;
            }

            let Some(matches) = self.rounds.get(self.current_round) else {
                self.phase = BracketPhase::Finished;
                return None;
            };

            if let Some(pending) = matches.iter().copied().find(|m| m.is_pending(&is_alive)) {
                self.phase = BracketPhase::MatchActive;
                return Some(pending);
            }

            let winners: Vec<EntrantId> =
                matches.iter().filter_map(|m| m.winner(&is_alive)).collect();

            self.current_round += 1;
            if self.current_round >= self.rounds.len() {
                self.phase = BracketPhase::Finished;
                info!(rounds = self.rounds.len(), "Bracket finished");
                return None;
            }

            info!(
                round = self.current_round,
                entrants = winners.len(),
                "Advancing to next round"
            );
            self.rounds[self.current_round] = pair_consecutive(&winners);
            self.phase = BracketPhase::RoundActive;
        }
    }

    /// Mark the handed-out match as resolved.
    pub fn record_result(&mut self) {
        if self.phase == BracketPhase::MatchActive {
            self.phase = BracketPhase::RoundActive;
        }
    }
}

/// Pair `[a, b, c, d, ...]` into `(a, b), (c, d), ...`. A trailing odd
/// entrant gets no pairing.
fn pair_consecutive(entrants: &[EntrantId]) -> Vec<Match> {
    entrants
        .chunks_exact(2)
        .map(|pair| Match::new(pair[0], pair[1]))
        .collect()
}
