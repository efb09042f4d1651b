//! Player account ledger.
//!
//! Tracks the free-to-play economy around the tournament: daily free
//! entries, ad-funded entries, paid entries, prize payouts and cash
//! withdrawal. All money is integer cents.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GameError, Result};
use crate::rng::RandomSource;
use crate::tournament::Tournament;

/// Ledger rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    /// Free entries restored each new day.
    pub free_games_per_day: u32,
    /// Ads needed to complete one ad set.
    pub ads_per_reward: u32,
    /// Free entries granted per completed ad set.
    pub free_games_per_reward: u32,
    /// Largest single withdrawal in cents.
    pub withdrawal_limit_cents: u64,
    /// Lowest owner revenue per ad view in cents.
    pub ad_revenue_cents_min: u64,
    /// Highest owner revenue per ad view in cents.
    pub ad_revenue_cents_max: u64,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            free_games_per_day: 3,
            ads_per_reward: 3,
            free_games_per_reward: 3,
            withdrawal_limit_cents: 200_000,
            // CPM of $100..$2200 per thousand views.
            ad_revenue_cents_min: 10,
            ad_revenue_cents_max: 220,
        }
    }
}

/// How an entry fee was covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMethod {
    /// One free game consumed.
    FreeGame,
    /// Cash deducted, in cents.
    Paid(u64),
}

/// Result of watching one ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdReward {
    /// Owner revenue accrued by this view, in cents.
    pub revenue_cents: u64,
    /// Free games granted by this view (non-zero when it completed a set).
    pub free_games_granted: u32,
}

/// A player's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    rules: EconomyRules,
    cash_cents: u64,
    free_games: u32,
    last_refresh_day: u64,
    ads_watched: u32,
    ad_sets_completed: u32,
    owner_revenue_cents: u64,
    ads_enabled: bool,
    last_withdrawal_cents: u64,
}

impl Account {
    /// Open an account on day `today` with the daily allowance of free games.
    #[must_use]
    pub fn new(rules: EconomyRules, today: u64) -> Self {
        Self {
            rules,
            cash_cents: 0,
            free_games: rules.free_games_per_day,
            last_refresh_day: today,
            ads_watched: 0,
            ad_sets_completed: 0,
            owner_revenue_cents: 0,
            ads_enabled: true,
            last_withdrawal_cents: 0,
        }
    }

    /// Cash on hand in cents.
    #[must_use]
    pub const fn cash_cents(&self) -> u64 {
        self.cash_cents
    }

    /// Free entries available.
    #[must_use]
    pub const fn free_games(&self) -> u32 {
        self.free_games
    }

    /// Ads watched over the account's lifetime.
    #[must_use]
    pub const fn ads_watched(&self) -> u32 {
        self.ads_watched
    }

    /// Completed ad sets.
    #[must_use]
    pub const fn ad_sets_completed(&self) -> u32 {
        self.ad_sets_completed
    }

    /// Owner revenue accrued from ad views, in cents.
    #[must_use]
    pub const fn owner_revenue_cents(&self) -> u64 {
        self.owner_revenue_cents
    }

    /// Most recent withdrawal amount in cents.
    #[must_use]
    pub const fn last_withdrawal_cents(&self) -> u64 {
        self.last_withdrawal_cents
    }

    /// Whether ads can be watched.
    #[must_use]
    pub const fn ads_enabled(&self) -> bool {
        self.ads_enabled
    }

    /// Ledger rules.
    #[must_use]
    pub const fn rules(&self) -> &EconomyRules {
        &self.rules
    }

    /// Switch ad playback on or off.
    pub fn set_ads_enabled(&mut self, enabled: bool) {
        self.ads_enabled = enabled;
    }

    /// Add cash.
    pub fn credit(&mut self, amount_cents: u64) {
        self.cash_cents = self.cash_cents.saturating_add(amount_cents);
    }

    /// Reset free games to the daily allowance when a new day has begun.
    ///
    /// Returns true when a reset happened. The allowance replaces any
    /// remaining free games rather than adding to them.
    pub fn refresh_daily(&mut self, today: u64) -> bool {
        if today <= self.last_refresh_day {
            return false;
        }
        self.free_games = self.rules.free_games_per_day;
        self.last_refresh_day = today;
        debug!(day = today, free_games = self.free_games, "Daily free games restored");
        true
    }

    /// Cover a tournament entry fee, preferring a free game over cash.
    ///
    /// # Errors
    /// [`GameError::InsufficientFunds`] when there is no free game and not
    /// enough cash.
    pub fn enter_tournament(&mut self, entry_fee_cents: u64) -> Result<EntryMethod> {
        if self.free_games > 0 {
            self.free_games -= 1;
            return Ok(EntryMethod::FreeGame);
        }

        if self.cash_cents >= entry_fee_cents {
            self.cash_cents -= entry_fee_cents;
            return Ok(EntryMethod::Paid(entry_fee_cents));
        }

        Err(GameError::InsufficientFunds {
            required: entry_fee_cents,
            available: self.cash_cents,
        })
    }

    /// Watch one ad.
    ///
    /// Every `ads_per_reward`-th view completes a set and grants
    /// `free_games_per_reward` free games.
    ///
    /// # Errors
    /// [`GameError::AdsDisabled`] when ads are switched off.
    pub fn watch_ad<D: RandomSource>(&mut self, dice: &mut D) -> Result<AdReward> {
        if !self.ads_enabled {
            return Err(GameError::AdsDisabled);
        }

        self.ads_watched += 1;
        let low = self.rules.ad_revenue_cents_min;
        let high = self.rules.ad_revenue_cents_max.max(low);
        let revenue_cents = dice.roll_between(low, high);
        self.owner_revenue_cents = self.owner_revenue_cents.saturating_add(revenue_cents);

        let mut free_games_granted = 0;
        if self.rules.ads_per_reward > 0 && self.ads_watched % self.rules.ads_per_reward == 0 {
            free_games_granted = self.rules.free_games_per_reward;
            self.free_games += free_games_granted;
            self.ad_sets_completed += 1;
            info!(
                ad_sets = self.ad_sets_completed,
                free_games = self.free_games,
                "Ad set completed"
            );
        }

        Ok(AdReward {
            revenue_cents,
            free_games_granted,
        })
    }

    /// Withdraw `amount_cents`.
    ///
    /// # Errors
    /// Fails when the amount exceeds the balance or the withdrawal limit.
    pub fn withdraw(&mut self, amount_cents: u64) -> Result<u64> {
        if amount_cents > self.rules.withdrawal_limit_cents {
            return Err(GameError::WithdrawalExceedsLimit {
                requested: amount_cents,
                limit: self.rules.withdrawal_limit_cents,
            });
        }
        if amount_cents > self.cash_cents {
            return Err(GameError::WithdrawalExceedsBalance {
                requested: amount_cents,
                available: self.cash_cents,
            });
        }

        self.cash_cents -= amount_cents;
        self.last_withdrawal_cents = amount_cents;
        info!(amount_cents, remaining = self.cash_cents, "Cash withdrawn");
        Ok(amount_cents)
    }

    /// Withdraw as much as the limit allows.
    ///
    /// # Errors
    /// Never fails in practice; shares [`Account::withdraw`]'s signature.
    pub fn withdraw_max(&mut self) -> Result<u64> {
        self.withdraw(self.cash_cents.min(self.rules.withdrawal_limit_cents))
    }

    /// Pay out the prize pool if the human won `tournament`.
    ///
    /// Returns the amount credited (zero when the tournament is unfinished
    /// or an AI entrant took it).
    pub fn award_prize<R: RandomSource>(&mut self, tournament: &Tournament<R>) -> u64 {
        let human_won = tournament.champion().is_some_and(|c| c.is_human());
        if !human_won {
            return 0;
        }
        let prize = tournament.prize_pool_cents();
        self.credit(prize);
        info!(prize_cents = prize, cash = self.cash_cents, "Prize awarded");
        prize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::test_dice::ScriptedDice;

    fn account() -> Account {
        Account::new(EconomyRules::default(), 0)
    }

    #[test]
    fn test_new_account_has_daily_free_games() {
        let acct = account();
        assert_eq!(acct.free_games(), 3);
        assert_eq!(acct.cash_cents(), 0);
        assert!(acct.ads_enabled());
    }

    #[test]
    fn test_entry_prefers_free_games_then_cash() {
        let mut acct = account();
        for _ in 0..3 {
            assert_eq!(acct.enter_tournament(1_000), Ok(EntryMethod::FreeGame));
        }
        assert_eq!(
            acct.enter_tournament(1_000),
            Err(GameError::InsufficientFunds {
                required: 1_000,
                available: 0
            })
        );

        acct.credit(1_500);
        assert_eq!(acct.enter_tournament(1_000), Ok(EntryMethod::Paid(1_000)));
        assert_eq!(acct.cash_cents(), 500);
    }

    #[test]
    fn test_refresh_daily_resets_not_adds() {
        let mut acct = account();
        let mut dice = ScriptedDice::always(0);
        for _ in 0..3 {
            acct.watch_ad(&mut dice).unwrap();
        }
        assert_eq!(acct.free_games(), 6);

        assert!(!acct.refresh_daily(0));
        assert_eq!(acct.free_games(), 6);

        assert!(acct.refresh_daily(1));
        assert_eq!(acct.free_games(), 3);
        assert!(!acct.refresh_daily(1));
    }

    #[test]
    fn test_every_third_ad_grants_free_games() {
        let mut acct = account();
        let mut dice = ScriptedDice::always(0);

        let first = acct.watch_ad(&mut dice).unwrap();
        let second = acct.watch_ad(&mut dice).unwrap();
        let third = acct.watch_ad(&mut dice).unwrap();

        assert_eq!(first.free_games_granted, 0);
        assert_eq!(second.free_games_granted, 0);
        assert_eq!(third.free_games_granted, 3);
        assert_eq!(acct.ad_sets_completed(), 1);
        assert_eq!(acct.ads_watched(), 3);
        assert_eq!(acct.owner_revenue_cents(), 30);
    }

    #[test]
    fn test_ads_disabled() {
        let mut acct = account();
        acct.set_ads_enabled(false);
        let mut dice = ScriptedDice::always(0);
        assert_eq!(acct.watch_ad(&mut dice), Err(GameError::AdsDisabled));
        assert_eq!(acct.ads_watched(), 0);
    }

    #[test]
    fn test_withdraw_limits() {
        let mut acct = account();
        acct.credit(300_000);

        assert!(matches!(
            acct.withdraw(250_000),
            Err(GameError::WithdrawalExceedsLimit { .. })
        ));
        assert_eq!(acct.withdraw_max(), Ok(200_000));
        assert_eq!(acct.cash_cents(), 100_000);
        assert!(matches!(
            acct.withdraw(150_000),
            Err(GameError::WithdrawalExceedsBalance { .. })
        ));
        assert_eq!(acct.withdraw_max(), Ok(100_000));
        assert_eq!(acct.cash_cents(), 0);
        assert_eq!(acct.last_withdrawal_cents(), 100_000);
    }
}
