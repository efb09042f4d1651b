//! Tournament: roster, bracket and the per-tick match step.
//!
//! The host drives a tournament with two calls:
//!
//! 1. [`Tournament::start_next_fight`] stages the next pending match, or
//!    reports the final [`Standing`] once the bracket is exhausted.
//! 2. [`Tournament::step`] advances the staged match by one tick until it
//!    resolves.
//!
//! # Example
//!
//! ```
//! use arena_core::config::TournamentConfig;
//! use arena_core::combatant::InputIntent;
//! use arena_core::tournament::{FightStatus, Tournament};
//!
//! let mut tournament = Tournament::seeded(&TournamentConfig::default(), 7).unwrap();
//! while let FightStatus::Active(_) = tournament.start_next_fight() {
//!     while tournament.active_match().is_some() {
//!         tournament.step(InputIntent::IDLE);
//!     }
//! }
//! assert!(tournament.is_finished());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::{debug, info};

use crate::bracket::{Bracket, BracketPhase, Match};
use crate::combatant::{AttackOutcome, Combatant, Control, EntrantId, Facing, InputIntent, MoveOutcome};
use crate::config::{ArenaLayout, TournamentConfig};
use crate::error::{GameError, Result};
use crate::rng::{sample_indices, seeded, RandomSource, SeededRng};
use crate::snapshot::TournamentSnapshot;
use crate::weapons::Weapon;

/// Who is left standing across the whole roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Standing {
    /// Exactly one entrant is alive.
    Champion(EntrantId),
    /// Nobody is alive.
    NoSurvivors,
    /// More than one entrant is alive; no champion can be named.
    Contested(Vec<EntrantId>),
}

impl Standing {
    /// Scan `roster` for survivors.
    #[must_use]
    pub fn of(roster: &[Combatant]) -> Self {
        let alive: Vec<EntrantId> = roster
            .iter()
            .filter(|c| c.is_alive())
            .map(Combatant::id)
            .collect();
        match alive.as_slice() {
            [] => Standing::NoSurvivors,
            [only] => Standing::Champion(*only),
            _ => Standing::Contested(alive),
        }
    }

    /// The champion, if the standing names exactly one.
    #[must_use]
    pub fn champion(&self) -> Option<EntrantId> {
        match self {
            Standing::Champion(id) => Some(*id),
            _ => None,
        }
    }
}

/// Answer to [`Tournament::start_next_fight`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FightStatus {
    /// This match is staged and ready to step.
    Active(Match),
    /// No pending matches remain.
    Finished(Standing),
}

/// Answer to [`Tournament::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTick {
    /// No match is staged.
    Idle,
    /// Both combatants are still standing.
    Ongoing,
    /// The match ended this tick.
    Resolved {
        /// Survivor.
        winner: EntrantId,
        /// Eliminated entrant.
        loser: EntrantId,
    },
}

/// A single-elimination tournament.
#[derive(Debug, Clone)]
pub struct Tournament<R: RandomSource = SeededRng> {
    roster: Vec<Combatant>,
    bracket: Bracket,
    active: Option<Match>,
    entry_fee_cents: u64,
    prize_pool_cents: u64,
    champion: Option<EntrantId>,
    arena: ArenaLayout,
    tick: u64,
    dice: R,
}

impl Tournament<SeededRng> {
    /// Build a tournament driven by the seeded production source.
    ///
    /// # Errors
    /// See [`Tournament::new`].
    pub fn seeded(config: &TournamentConfig, seed: u64) -> Result<Self> {
        Self::new(config, seeded(seed))
    }
}

impl<R: RandomSource> Tournament<R> {
    /// Generate a roster (one human, the rest AI with names drawn from the
    /// pool, weapons drawn from the catalog) and build its bracket.
    ///
    /// The human gets id 0; AI entrants get ids 1..n.
    ///
    /// # Errors
    /// [`GameError::InvalidEntrantCount`] or [`GameError::NamePoolExhausted`].
    pub fn new(config: &TournamentConfig, mut dice: R) -> Result<Self> {
        let count = config.entrant_count;
        if count < 2 || !count.is_power_of_two() {
            return Err(GameError::InvalidEntrantCount(count));
        }
        let needed = count - 1;
        if config.ai_names.len() < needed {
            return Err(GameError::NamePoolExhausted {
                needed,
                available: config.ai_names.len(),
            });
        }

        let mut roster = Vec::with_capacity(count);
        let human_weapon = Weapon::draw(&mut dice);
        roster.push(Combatant::new(
            0,
            config.human_name.clone(),
            Control::Human,
            human_weapon,
        ));

        let picks = sample_indices(&mut dice, config.ai_names.len(), needed);
        for (seat, name_index) in picks.into_iter().enumerate() {
            let weapon = Weapon::draw(&mut dice);
            roster.push(Combatant::new(
                seat as EntrantId + 1,
                config.ai_names[name_index].clone(),
                Control::Ai,
                weapon,
            ));
        }

        Self::from_roster(roster, config.entry_fee_cents, config.arena, dice)
    }

    /// Build a tournament over a caller-supplied roster.
    ///
    /// # Errors
    /// [`GameError::InvalidEntrantCount`] unless the roster size is a power
    /// of two of at least two; [`GameError::DuplicateEntrant`] if two
    /// entrants share an id.
    pub fn from_roster(
        roster: Vec<Combatant>,
        entry_fee_cents: u64,
        arena: ArenaLayout,
        mut dice: R,
    ) -> Result<Self> {
        let ids: Vec<EntrantId> = roster.iter().map(Combatant::id).collect();
        let bracket = Bracket::build(&ids, &mut dice)?;
        let prize_pool_cents = roster.len() as u64 * entry_fee_cents;

        info!(
            entrants = roster.len(),
            prize_pool_cents,
            "Tournament created"
        );

        Ok(Self {
            roster,
            bracket,
            active: None,
            entry_fee_cents,
            prize_pool_cents,
            champion: None,
            arena,
            tick: 0,
            dice,
        })
    }

    /// Every entrant, in roster order.
    #[must_use]
    pub fn roster(&self) -> &[Combatant] {
        &self.roster
    }

    /// Look up an entrant.
    #[must_use]
    pub fn combatant(&self, id: EntrantId) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.id() == id)
    }

    /// The human entrant, if the roster has one.
    #[must_use]
    pub fn human(&self) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.is_human())
    }

    /// The bracket.
    #[must_use]
    pub const fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    /// The staged match, if any.
    #[must_use]
    pub const fn active_match(&self) -> Option<Match> {
        self.active
    }

    /// Zero-based index of the round being played.
    #[must_use]
    pub const fn current_round(&self) -> usize {
        self.bracket.current_round()
    }

    /// Bracket lifecycle state.
    #[must_use]
    pub const fn phase(&self) -> BracketPhase {
        self.bracket.phase()
    }

    /// Whether every round has been played.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.bracket.is_finished()
    }

    /// The crowned champion, once the tournament has finished with one.
    #[must_use]
    pub fn champion(&self) -> Option<&Combatant> {
        self.champion.and_then(|id| self.combatant(id))
    }

    /// Entry fee in cents.
    #[must_use]
    pub const fn entry_fee_cents(&self) -> u64 {
        self.entry_fee_cents
    }

    /// Prize pool in cents: entrant count times entry fee.
    #[must_use]
    pub const fn prize_pool_cents(&self) -> u64 {
        self.prize_pool_cents
    }

    /// Arena starting marks.
    #[must_use]
    pub const fn arena(&self) -> &ArenaLayout {
        &self.arena
    }

    /// Match ticks stepped so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Scan the roster for survivors.
    ///
    /// Callable at any point; mid-tournament it reports
    /// [`Standing::Contested`].
    #[must_use]
    pub fn get_tournament_winner(&self) -> Standing {
        Standing::of(&self.roster)
    }

    /// Stage the next pending match.
    ///
    /// While the staged match is unresolved this returns it again without
    /// re-staging. Otherwise the bracket is searched (closing rounds and
    /// pairing winners as needed); a newly found match has its entrants put
    /// on their starting marks facing each other. When nothing is pending
    /// the final standing is computed and the champion recorded.
    pub fn start_next_fight(&mut self) -> FightStatus {
        if let Some(active) = self.active {
            if active.is_pending(|id| self.is_alive(id)) {
                return FightStatus::Active(active);
            }
            self.bracket.record_result();
            self.active = None;
        }

        let roster = &self.roster;
        let next = self
            .bracket
            .next_pending(|id| roster.iter().any(|c| c.id() == id && c.is_alive()));

        match next {
            Some(pairing) => {
                self.stage(pairing);
                self.active = Some(pairing);
                FightStatus::Active(pairing)
            }
            None => {
                let standing = self.get_tournament_winner();
                if self.champion.is_none() {
                    self.champion = standing.champion();
                    if let Some(champion) = self.champion() {
                        info!(
                            champion = champion.name(),
                            weapon = champion.weapon().name(),
                            human = champion.is_human(),
                            "Champion crowned"
                        );
                    }
                }
                FightStatus::Finished(standing)
            }
        }
    }

    /// Advance the staged match by one tick.
    ///
    /// Both combatants run [`Combatant::update`]; then the left entrant acts,
    /// then the right. AI entrants act through [`Combatant::apply_move`];
    /// the human entrant applies `intent`.
    pub fn step(&mut self, intent: InputIntent) -> MatchTick {
        let Some(active) = self.active else {
            return MatchTick::Idle;
        };
        let (Some(li), Some(ri)) = (self.index_of(active.left), self.index_of(active.right)) else {
            self.active = None;
            return MatchTick::Idle;
        };
        let Some((left, right)) = pair_mut(&mut self.roster, li, ri) else {
            self.active = None;
            return MatchTick::Idle;
        };

        left.update();
        right.update();

        let left_outcome = act(left, right, intent, &mut self.dice);
        let right_outcome = act(right, left, intent, &mut self.dice);
        log_knockout(left, right, left_outcome);
        log_knockout(right, left, right_outcome);

        let left_alive = left.is_alive();
        let right_alive = right.is_alive();
        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Tournament state hash");
        }

        let (winner, loser) = match (left_alive, right_alive) {
            (true, true) => return MatchTick::Ongoing,
            (true, false) => (active.left, active.right),
            (false, true) => (active.right, active.left),
            // Unreachable with sequential acting: a fallen actor never swings.
            (false, false) => {
                self.bracket.record_result();
                self.active = None;
                return MatchTick::Idle;
            }
        };

        self.bracket.record_result();
        self.active = None;
        debug!(winner, loser, tick = self.tick, "Match resolved");
        MatchTick::Resolved { winner, loser }
    }

    /// Read-only view for presentation layers.
    #[must_use]
    pub fn snapshot(&self) -> TournamentSnapshot {
        TournamentSnapshot::capture(self)
    }

    /// Hash of the observable tournament state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        let mut by_id: Vec<&Combatant> = self.roster.iter().collect();
        by_id.sort_by_key(|c| c.id());
        by_id.len().hash(&mut hasher);
        for combatant in by_id {
            combatant.hash(&mut hasher);
        }
        self.bracket.hash(&mut hasher);
        self.active.hash(&mut hasher);
        self.champion.hash(&mut hasher);
        hasher.finish()
    }

    fn index_of(&self, id: EntrantId) -> Option<usize> {
        self.roster.iter().position(|c| c.id() == id)
    }

    fn is_alive(&self, id: EntrantId) -> bool {
        self.combatant(id).is_some_and(Combatant::is_alive)
    }

    fn stage(&mut self, pairing: Match) {
        let (left_mark, right_mark) = (self.arena.left(), self.arena.right());
        let (Some(li), Some(ri)) = (self.index_of(pairing.left), self.index_of(pairing.right)) else {
            return;
        };
        if let Some((left, right)) = pair_mut(&mut self.roster, li, ri) {
            left.stage(left_mark, Facing::Right);
            right.stage(right_mark, Facing::Left);
            debug!(
                round = self.bracket.current_round(),
                left = left.name(),
                right = right.name(),
                "Match staged"
            );
        }
    }
}

fn act<D: RandomSource>(
    actor: &mut Combatant,
    opponent: &mut Combatant,
    intent: InputIntent,
    dice: &mut D,
) -> MoveOutcome {
    if actor.is_human() {
        actor.apply_input_intent(intent, opponent, dice)
    } else {
        actor.apply_move(opponent, dice)
    }
}

fn log_knockout(attacker: &Combatant, target: &Combatant, outcome: MoveOutcome) {
    if let MoveOutcome::Attacked(AttackOutcome::Knockout { damage }) = outcome {
        debug!(
            attacker = attacker.name(),
            target = target.name(),
            damage,
            "Knockout"
        );
    }
}

/// Borrow two distinct roster slots mutably.
fn pair_mut(
    roster: &mut [Combatant],
    a: usize,
    b: usize,
) -> Option<(&mut Combatant, &mut Combatant)> {
    if a == b || a >= roster.len() || b >= roster.len() {
        return None;
    }
    if a < b {
        let (low, high) = roster.split_at_mut(b);
        Some((&mut low[a], &mut high[0]))
    } else {
        let (low, high) = roster.split_at_mut(a);
        Some((&mut high[0], &mut low[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Fixed;
    use crate::rng::test_dice::ScriptedDice;
    use crate::weapons::WeaponKind;

    fn ai(id: EntrantId, kind: WeaponKind) -> Combatant {
        Combatant::new(id, format!("AI{id}"), Control::Ai, kind.weapon())
    }

    fn four_spears() -> Tournament<ScriptedDice> {
        let roster = (0..4).map(|id| ai(id, WeaponKind::Spear)).collect();
        Tournament::from_roster(roster, 1_000, ArenaLayout::default(), ScriptedDice::always(0))
            .unwrap()
    }

    fn play_out<R: RandomSource>(t: &mut Tournament<R>) -> Standing {
        loop {
            match t.start_next_fight() {
                FightStatus::Active(_) => {
                    let mut guard = 0;
                    while t.step(InputIntent::IDLE) == MatchTick::Ongoing {
                        guard += 1;
                        assert!(guard < 10_000, "match never resolved");
                    }
                }
                FightStatus::Finished(standing) => return standing,
            }
        }
    }

    #[test]
    fn test_new_builds_one_human_and_ai_field() {
        let t = Tournament::seeded(&TournamentConfig::default(), 1).unwrap();
        assert_eq!(t.roster().len(), 8);
        assert_eq!(t.roster().iter().filter(|c| c.is_human()).count(), 1);
        assert_eq!(t.human().map(Combatant::id), Some(0));
        assert_eq!(t.prize_pool_cents(), 8_000);
        assert_eq!(t.entry_fee_cents(), 1_000);
        assert_eq!(t.phase(), BracketPhase::RoundActive);
        assert!(t.active_match().is_none());

        let mut names: Vec<&str> = t.roster().iter().map(Combatant::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_new_rejects_small_name_pool() {
        let config = TournamentConfig {
            ai_names: vec!["Solo".to_string()],
            ..TournamentConfig::default()
        };
        let err = Tournament::seeded(&config, 1).unwrap_err();
        assert_eq!(
            err,
            GameError::NamePoolExhausted {
                needed: 7,
                available: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_odd_field() {
        let config = TournamentConfig {
            entrant_count: 6,
            ..TournamentConfig::default()
        };
        assert_eq!(
            Tournament::seeded(&config, 1).unwrap_err(),
            GameError::InvalidEntrantCount(6)
        );
    }

    #[test]
    fn test_from_roster_rejects_duplicate_ids() {
        let roster = [0, 0, 1, 2].into_iter().map(|id| ai(id, WeaponKind::Spear)).collect();
        let result =
            Tournament::from_roster(roster, 1_000, ArenaLayout::default(), ScriptedDice::always(0));
        let Err(err) = result else {
            panic!("duplicate ids accepted");
        };
        assert_eq!(err, GameError::DuplicateEntrant(0));
    }

    #[test]
    fn test_start_next_fight_stages_entrants() {
        let mut t = four_spears();
        let FightStatus::Active(pairing) = t.start_next_fight() else {
            panic!("expected a match");
        };
        assert_eq!(pairing, Match::new(0, 1));
        let left = t.combatant(0).unwrap();
        let right = t.combatant(1).unwrap();
        assert_eq!(left.position(), Fixed::from_num(210));
        assert_eq!(right.position(), Fixed::from_num(710));
        assert_eq!(left.facing(), Facing::Right);
        assert_eq!(right.facing(), Facing::Left);
        assert_eq!(t.phase(), BracketPhase::MatchActive);
    }

    #[test]
    fn test_start_next_fight_does_not_restage_mid_match() {
        let mut t = four_spears();
        t.start_next_fight();
        for _ in 0..10 {
            t.step(InputIntent::IDLE);
        }
        let moved = t.combatant(0).unwrap().position();
        assert_eq!(t.start_next_fight(), FightStatus::Active(Match::new(0, 1)));
        assert_eq!(t.combatant(0).unwrap().position(), moved);
    }

    #[test]
    fn test_step_without_match_is_idle() {
        let mut t = four_spears();
        assert_eq!(t.step(InputIntent::IDLE), MatchTick::Idle);
        assert_eq!(t.tick(), 0);
    }

    #[test]
    fn test_right_entrant_strikes_first_in_mirror_duel() {
        // The left spear closes to exactly 80 (not in reach), steps in, and
        // the right spear acts second with the gap at 75. Always-hit dice.
        let mut t = four_spears();
        t.start_next_fight();
        let mut ticks = 0;
        let result = loop {
            ticks += 1;
            match t.step(InputIntent::IDLE) {
                MatchTick::Ongoing => continue,
                other => break other,
            }
        };
        assert_eq!(result, MatchTick::Resolved { winner: 1, loser: 0 });
        assert_eq!(t.tick(), ticks);
        assert_eq!(t.combatant(1).unwrap().wins(), 1);
        assert_eq!(t.combatant(0).unwrap().wins(), 0);
        assert_eq!(t.combatant(0).unwrap().health(), 0);
        assert_eq!(t.combatant(1).unwrap().health(), 20);
        assert!(t.active_match().is_none());
        assert_eq!(t.phase(), BracketPhase::RoundActive);
    }

    #[test]
    fn test_full_tournament_crowns_single_champion() {
        let mut t = four_spears();
        let standing = play_out(&mut t);
        assert_eq!(standing, Standing::Champion(3));
        assert!(t.is_finished());
        assert_eq!(t.champion().map(Combatant::id), Some(3));
        assert_eq!(t.combatant(3).unwrap().wins(), 2);
        assert_eq!(t.bracket().round(1).unwrap(), &[Match::new(1, 3)]);
        assert_eq!(t.start_next_fight(), FightStatus::Finished(Standing::Champion(3)));
    }

    #[test]
    fn test_seeded_tournament_always_finishes() {
        for seed in 0..20 {
            let mut t = Tournament::seeded(&TournamentConfig::default(), seed).unwrap();
            let standing = play_out(&mut t);
            assert!(matches!(standing, Standing::Champion(_)), "seed {seed}: {standing:?}");
            let sizes: Vec<usize> = t.bracket().rounds().iter().map(Vec::len).collect();
            assert_eq!(sizes, vec![4, 2, 1]);
        }
    }

    #[test]
    fn test_standing_of_roster() {
        let mut roster: Vec<Combatant> = (0..3).map(|id| ai(id, WeaponKind::Axe)).collect();
        assert_eq!(Standing::of(&roster), Standing::Contested(vec![0, 1, 2]));

        roster[0].take_damage(100);
        roster[2].take_damage(100);
        assert_eq!(Standing::of(&roster), Standing::Champion(1));

        roster[1].take_damage(100);
        assert_eq!(Standing::of(&roster), Standing::NoSurvivors);
    }

    #[test]
    fn test_state_hash_tracks_progress() {
        let mut a = Tournament::seeded(&TournamentConfig::default(), 5).unwrap();
        let b = Tournament::seeded(&TournamentConfig::default(), 5).unwrap();
        assert_eq!(a.state_hash(), b.state_hash());
        a.start_next_fight();
        a.step(InputIntent::IDLE);
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_pair_mut_rejects_aliasing() {
        let mut roster: Vec<Combatant> = (0..2).map(|id| ai(id, WeaponKind::Axe)).collect();
        assert!(pair_mut(&mut roster, 0, 0).is_none());
        assert!(pair_mut(&mut roster, 0, 2).is_none());
        let (b, a) = pair_mut(&mut roster, 1, 0).unwrap();
        assert_eq!((a.id(), b.id()), (0, 1));
    }
}
