//! Multi-tournament session on one player account.
//!
//! Each entry pays its way through the ledger: a free game if one is left,
//! otherwise cash, optionally topping up free games by watching ads first.
//! Winnings go back into the account.

use arena_core::config::{ArenaConfig, TournamentConfig};
use arena_core::economy::{Account, EntryMethod};
use arena_core::error::{GameError, Result as GameResult};
use arena_core::rng::seeded;
use arena_core::tournament::Tournament;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::pilot::Pilot;
use crate::runner::{play, RunConfig, DEFAULT_MAX_TICKS_PER_MATCH};

/// Configuration for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seed for the first tournament; entry `i` uses `seed + i`.
    pub seed: u64,
    /// Tournaments to attempt.
    pub tournaments: u32,
    /// Tournaments played per in-game day before the day rolls over.
    pub tournaments_per_day: u32,
    /// Watch ads for free games when an entry cannot otherwise be covered.
    pub watch_ads_when_broke: bool,
    /// Withdraw as much as allowed once the session ends.
    pub cash_out: bool,
    /// Cash the account opens with, in cents.
    pub starting_cash_cents: u64,
    /// Input source for the human seat.
    pub pilot: Pilot,
    /// Tournament and ledger rules.
    pub arena: ArenaConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tournaments: 10,
            tournaments_per_day: 3,
            watch_ads_when_broke: true,
            cash_out: false,
            starting_cash_cents: 0,
            pilot: Pilot::Autopilot,
            arena: ArenaConfig::default(),
        }
    }
}

/// One session entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Seed the tournament ran with.
    pub seed: u64,
    /// In-game day.
    pub day: u64,
    /// How the entry fee was covered.
    pub method: EntryMethod,
    /// Ads watched just before this entry.
    pub ads_watched: u32,
    /// Whether the human seat took the title.
    pub won: bool,
    /// Prize credited, in cents.
    pub prize_cents: u64,
    /// Cash after the prize was credited, in cents.
    pub cash_after_cents: u64,
}

/// Outcome of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Entries played, in order.
    pub entries: Vec<SessionEntry>,
    /// Set when the session stopped early because an entry could not be paid.
    pub stopped_early: bool,
    /// Final cash, in cents.
    pub cash_cents: u64,
    /// Free games left.
    pub free_games: u32,
    /// Owner revenue from ad views, in cents.
    pub owner_revenue_cents: u64,
    /// Amount withdrawn at the end, in cents.
    pub withdrawn_cents: u64,
    /// Account state at the end.
    pub account: Account,
}

impl SessionReport {
    /// Titles taken over the session.
    #[must_use]
    pub fn titles(&self) -> usize {
        self.entries.iter().filter(|e| e.won).count()
    }
}

/// Play a session.
///
/// # Errors
/// Fails when the tournament config is rejected or a ledger operation
/// fails for a reason other than running out of money.
pub fn run_session(config: &SessionConfig) -> Result<SessionReport> {
    let rules = config.arena.economy;
    let fee = config.arena.tournament.entry_fee_cents;
    let per_day = u64::from(config.tournaments_per_day.max(1));
    let mut account = Account::new(rules, 0);
    account.credit(config.starting_cash_cents);
    let mut ad_dice = seeded(config.seed ^ 0xAD5E_ED00);

    let mut entries = Vec::new();
    let mut stopped_early = false;

    info!(
        tournaments = config.tournaments,
        fee_cents = fee,
        "Session starting"
    );

    for index in 0..config.tournaments {
        let day = u64::from(index) / per_day;
        account.refresh_daily(day);

        let mut ads_watched = 0;
        if config.watch_ads_when_broke && account.free_games() == 0 && account.cash_cents() < fee {
            while account.free_games() == 0 {
                match account.watch_ad(&mut ad_dice) {
                    Ok(_) => ads_watched += 1,
                    Err(GameError::AdsDisabled) => break,
                    Err(e) => return Err(e.into()),
                }
                if rules.ads_per_reward == 0 || rules.free_games_per_reward == 0 {
                    break;
                }
            }
        }

        let seed = config.seed.wrapping_add(u64::from(index));
        let run = RunConfig {
            seed,
            tournament: config.arena.tournament.clone(),
            pilot: config.pilot.clone(),
            max_ticks_per_match: DEFAULT_MAX_TICKS_PER_MATCH,
        };
        let (method, mut tournament) = match open_entry(&mut account, &run.tournament, seed) {
            Ok(entry) => entry,
            Err(GameError::InsufficientFunds { required, available }) => {
                warn!(required, available, index, "Cannot cover entry fee, ending session");
                stopped_early = true;
                break;
            }
            Err(e) => return Err(e.into()),
        };
        let report = play(&mut tournament, &run);
        let prize_cents = account.award_prize(&tournament);

        entries.push(SessionEntry {
            seed,
            day,
            method,
            ads_watched,
            won: report.human_won(),
            prize_cents,
            cash_after_cents: account.cash_cents(),
        });
    }

    let withdrawn_cents = if config.cash_out && account.cash_cents() > 0 {
        account.withdraw_max()?
    } else {
        0
    };

    info!(
        entries = entries.len(),
        cash_cents = account.cash_cents(),
        owner_revenue_cents = account.owner_revenue_cents(),
        withdrawn_cents,
        "Session finished"
    );

    Ok(SessionReport {
        stopped_early,
        cash_cents: account.cash_cents(),
        free_games: account.free_games(),
        owner_revenue_cents: account.owner_revenue_cents(),
        withdrawn_cents,
        account,
        entries,
    })
}

/// Build the tournament for `seed`, then pay its entry fee.
///
/// A rejected config leaves the account untouched.
fn open_entry(
    account: &mut Account,
    tournament: &TournamentConfig,
    seed: u64,
) -> GameResult<(EntryMethod, Tournament)> {
    let built = Tournament::seeded(tournament, seed)?;
    let method = account.enter_tournament(tournament.entry_fee_cents)?;
    Ok((method, built))
}
