//! Arena configuration.
//!
//! Loaded from RON. Every field has a default, so a config file only needs
//! the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::economy::EconomyRules;
use crate::error::{GameError, Result};
use crate::math::Fixed;

/// Default AI name pool.
pub const DEFAULT_AI_NAMES: [&str; 15] = [
    "Ragnar", "Bjorn", "Ivar", "Lagertha", "Floki", "Harald", "Erik", "Sigurd", "Gunnar", "Sven",
    "Olaf", "Torsten", "Ubbe", "Hvitserk", "Halfdan",
];

/// Starting marks on the arena floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// Mark for the left entrant of a match.
    pub left_start: i32,
    /// Mark for the right entrant of a match.
    pub right_start: i32,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            left_start: 210,
            right_start: 710,
        }
    }
}

impl ArenaLayout {
    /// Left mark as a fixed-point position.
    #[must_use]
    pub fn left(&self) -> Fixed {
        Fixed::from_num(self.left_start)
    }

    /// Right mark as a fixed-point position.
    #[must_use]
    pub fn right(&self) -> Fixed {
        Fixed::from_num(self.right_start)
    }
}

/// Tournament setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Field size, human included. Must be a power of two.
    pub entrant_count: usize,
    /// Name given to the human entrant.
    pub human_name: String,
    /// Names drawn (without replacement) for AI entrants.
    pub ai_names: Vec<String>,
    /// Entry fee in cents.
    pub entry_fee_cents: u64,
    /// Arena starting marks.
    pub arena: ArenaLayout,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            entrant_count: 8,
            human_name: "Player".to_string(),
            ai_names: DEFAULT_AI_NAMES.iter().map(|s| (*s).to_string()).collect(),
            entry_fee_cents: 1_000,
            arena: ArenaLayout::default(),
        }
    }
}

/// Complete arena configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Tournament setup.
    pub tournament: TournamentConfig,
    /// Account ledger rules.
    pub economy: EconomyRules,
}

impl ArenaConfig {
    /// Load a config from a RON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| GameError::ConfigRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse a config from a RON string.
    ///
    /// # Errors
    /// Returns an error if the string does not parse.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Self::parse(ron, "<inline>")
    }

    fn parse(contents: &str, origin: &str) -> Result<Self> {
        ron::from_str(contents).map_err(|e| GameError::ConfigParse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }
}
