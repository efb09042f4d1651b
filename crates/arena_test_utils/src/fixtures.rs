//! Test fixtures and helpers.
//!
//! Loaded dice, pre-placed fighters and small tournaments for consistent
//! testing.

use arena_core::combatant::{Combatant, Control, EntrantId};
use arena_core::config::ArenaLayout;
use arena_core::rng::RandomSource;
use arena_core::tournament::Tournament;
use arena_core::weapons::WeaponKind;
use fixed::types::I32F32;
use proptest::prelude::*;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Dice with a scripted outcome.
///
/// Percent rolls cycle through the loaded values. Index picks cycle through
/// their own script (clamped to the requested range). Ranges always yield
/// their low end and shuffles leave slices in order, so bracket pairings
/// follow roster order.
#[derive(Debug, Clone)]
pub struct LoadedDice {
    rolls: Vec<u32>,
    picks: Vec<usize>,
    roll_cursor: usize,
    pick_cursor: usize,
}

impl LoadedDice {
    /// Every percent roll is `roll`; every pick is index 0.
    #[must_use]
    pub fn always(roll: u32) -> Self {
        Self::rolls(vec![roll])
    }

    /// Every swing hits, whatever the weapon.
    #[must_use]
    pub fn always_hit() -> Self {
        Self::always(0)
    }

    /// Every swing misses, whatever the weapon.
    ///
    /// The spear's 100% hit chance still lands.
    #[must_use]
    pub fn always_miss() -> Self {
        Self::always(99)
    }

    /// Percent rolls cycle through `rolls`.
    #[must_use]
    pub fn rolls(rolls: Vec<u32>) -> Self {
        Self {
            rolls,
            picks: vec![0],
            roll_cursor: 0,
            pick_cursor: 0,
        }
    }

    /// Replace the index-pick script.
    #[must_use]
    pub fn with_picks(mut self, picks: Vec<usize>) -> Self {
        self.picks = picks;
        self
    }

    /// Percent rolls consumed so far.
    #[must_use]
    pub fn rolls_used(&self) -> usize {
        self.roll_cursor
    }
}

impl RandomSource for LoadedDice {
    fn roll_percent(&mut self) -> u32 {
        let roll = self
            .rolls
            .get(self.roll_cursor % self.rolls.len().max(1))
            .copied()
            .unwrap_or(0);
        self.roll_cursor += 1;
        roll
    }

    fn pick_index(&mut self, len: usize) -> usize {
        let pick = self
            .picks
            .get(self.pick_cursor % self.picks.len().max(1))
            .copied()
            .unwrap_or(0);
        self.pick_cursor += 1;
        pick.min(len.saturating_sub(1))
    }

    fn roll_between(&mut self, low: u64, _high: u64) -> u64 {
        low
    }

    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}

/// An AI fighter named after its id, standing at `x`.
#[must_use]
pub fn fighter(id: EntrantId, weapon: WeaponKind, x: i32) -> Combatant {
    Combatant::new(id, format!("Fighter{id}"), Control::Ai, weapon.weapon()).at(x)
}

/// The human entrant, standing at `x`.
#[must_use]
pub fn human(id: EntrantId, weapon: WeaponKind, x: i32) -> Combatant {
    Combatant::new(id, "Player", Control::Human, weapon.weapon()).at(x)
}

/// Two AI fighters on the default arena marks, left facing right.
#[must_use]
pub fn duel(left: WeaponKind, right: WeaponKind) -> (Combatant, Combatant) {
    let arena = ArenaLayout::default();
    (
        fighter(0, left, arena.left_start),
        fighter(1, right, arena.right_start),
    )
}

/// A tournament over AI fighters armed as listed, ids in order.
///
/// Loaded dice never shuffle, so the opening round pairs `(0, 1)`,
/// `(2, 3)` and so on.
///
/// # Panics
///
/// Panics unless `weapons.len()` is a power of two of at least two.
#[must_use]
pub fn ai_tournament(weapons: &[WeaponKind], dice: LoadedDice) -> Tournament<LoadedDice> {
    let roster = weapons
        .iter()
        .zip(0..)
        .map(|(&kind, id)| fighter(id, kind, 0))
        .collect();
    Tournament::from_roster(roster, 1_000, ArenaLayout::default(), dice)
        .expect("fixture field size must be a power of two")
}

/// Strategy over the weapon kinds.
pub fn any_weapon() -> impl Strategy<Value = WeaponKind> {
    prop_oneof![
        Just(WeaponKind::Sword),
        Just(WeaponKind::Axe),
        Just(WeaponKind::Spear),
    ]
}

/// Strategy over valid field sizes (2, 4, 8, 16).
pub fn field_size() -> impl Strategy<Value = usize> {
    (1u32..=4).prop_map(|exp| 1usize << exp)
}
