//! Error types for tournament construction and the account ledger.
//!
//! Simulation stepping never fails; these variants only come out of
//! building a tournament, loading configuration, or moving money around.

use thiserror::Error;

use crate::combatant::EntrantId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the arena core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Brackets only accept a power-of-two field of at least two entrants.
    #[error("Invalid entrant count: {0} (must be a power of two, at least 2)")]
    InvalidEntrantCount(usize),

    /// The same entrant id appears more than once in a field.
    #[error("Duplicate entrant id: {0}")]
    DuplicateEntrant(EntrantId),

    /// Not enough distinct AI names to fill the roster.
    #[error("Name pool exhausted: need {needed} AI names, have {available}")]
    NamePoolExhausted {
        /// Names required.
        needed: usize,
        /// Names configured.
        available: usize,
    },

    /// No free game and not enough cash to pay the entry fee.
    #[error("Insufficient funds: need {required} cents, have {available}")]
    InsufficientFunds {
        /// Entry fee in cents.
        required: u64,
        /// Cash on hand in cents.
        available: u64,
    },

    /// Ad playback requested while ads are switched off.
    #[error("Ads are disabled for this account")]
    AdsDisabled,

    /// Withdrawal larger than the account balance.
    #[error("Withdrawal of {requested} cents exceeds balance of {available}")]
    WithdrawalExceedsBalance {
        /// Amount requested in cents.
        requested: u64,
        /// Cash on hand in cents.
        available: u64,
    },

    /// Withdrawal larger than the per-request limit.
    #[error("Withdrawal of {requested} cents exceeds limit of {limit}")]
    WithdrawalExceedsLimit {
        /// Amount requested in cents.
        requested: u64,
        /// Configured limit in cents.
        limit: u64,
    },

    /// Config file could not be read.
    #[error("Failed to read config file '{path}': {message}")]
    ConfigRead {
        /// Path to the file.
        path: String,
        /// Error message.
        message: String,
    },

    /// Config file did not parse.
    #[error("Failed to parse config '{path}': {message}")]
    ConfigParse {
        /// Path to the file (or `<inline>` for strings).
        path: String,
        /// Error message.
        message: String,
    },
}
