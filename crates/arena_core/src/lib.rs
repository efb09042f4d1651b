//! # Arena Core
//!
//! Tournament and combat simulation for the Viking arena.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No input devices
//! - No wall clock
//! - No unseeded randomness (every roll goes through [`rng::RandomSource`])
//!
//! Hosts (a windowed client, the headless runner, tests) own the frame loop
//! and call [`tournament::Tournament::start_next_fight`] and
//! [`tournament::Tournament::step`].
//!
//! ## Crate Structure
//!
//! - [`combatant`] - Per-entrant combat state and decisions
//! - [`bracket`] - Single-elimination pairings
//! - [`tournament`] - Roster, bracket and the match step
//! - [`weapons`] - Weapon catalog
//! - [`economy`] - Player account ledger
//! - [`config`] - RON configuration
//! - [`snapshot`] - Read-only views for presentation
//! - [`math`] - Fixed-point helpers

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod bracket;
pub mod combatant;
pub mod config;
pub mod economy;
pub mod error;
pub mod math;
pub mod rng;
pub mod snapshot;
pub mod tournament;
pub mod weapons;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bracket::{Bracket, BracketPhase, Match};
    pub use crate::combatant::{
        AttackOutcome, Combatant, Control, EntrantId, Facing, InputIntent, MoveOutcome,
    };
    pub use crate::config::{ArenaConfig, ArenaLayout, TournamentConfig};
    pub use crate::economy::{Account, AdReward, EconomyRules, EntryMethod};
    pub use crate::error::{GameError, Result};
    pub use crate::math::Fixed;
    pub use crate::rng::{seeded, RandomSource, SeededRng};
    pub use crate::snapshot::TournamentSnapshot;
    pub use crate::tournament::{FightStatus, MatchTick, Standing, Tournament};
    pub use crate::weapons::{Weapon, WeaponKind};
}
