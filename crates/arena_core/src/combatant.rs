//! Combatant simulation.
//!
//! A combatant is one entrant on the arena floor. Each host tick the
//! combatant first runs [`Combatant::update`] (animation and cooldown
//! bookkeeping), then acts: AI entrants through [`Combatant::apply_move`],
//! the human entrant through [`Combatant::apply_input_intent`].
//!
//! # Invariants
//!
//! - `alive == (health > 0)`
//! - Health never goes below zero; a lethal blow clamps it to exactly 0.
//! - `alive` flips to false once and never comes back.

use serde::{Deserialize, Serialize};

use crate::math::{direction_toward, fixed_serde, horizontal_distance, Fixed};
use crate::rng::RandomSource;
use crate::weapons::Weapon;

/// Roster identifier.
pub type EntrantId = u32;

/// Health every entrant starts with.
pub const MAX_HEALTH: u32 = 100;

/// Frames an attack animation lasts before the combatant can act again.
pub const ATTACK_ANIMATION_TICKS: u32 = 20;

/// Distance an AI combatant closes per tick.
pub const AI_VELOCITY: i32 = 5;

/// Who drives the combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// Driven by input intents from the host.
    Human,
    /// Driven by [`Combatant::apply_move`].
    Ai,
}

/// Facing direction on the arena floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing negative x.
    Left,
    /// Facing positive x.
    Right,
}

impl Facing {
    /// Build from a direction sign.
    #[must_use]
    pub const fn from_sign(sign: i8) -> Self {
        if sign < 0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// Direction sign (+1 right, -1 left).
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }
}

/// Input applied to the human combatant for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputIntent {
    /// Horizontal displacement this tick.
    #[serde(with = "fixed_serde")]
    pub move_delta: Fixed,
    /// Whether the attack button was pressed.
    pub attack: bool,
}

impl InputIntent {
    /// No movement, no attack.
    pub const IDLE: Self = Self {
        move_delta: Fixed::ZERO,
        attack: false,
    };

    /// Move by `delta` without attacking.
    #[must_use]
    pub fn step(delta: i32) -> Self {
        Self {
            move_delta: Fixed::from_num(delta),
            attack: false,
        }
    }

    /// Attack in place.
    #[must_use]
    pub const fn strike() -> Self {
        Self {
            move_delta: Fixed::ZERO,
            attack: true,
        }
    }
}

/// Result of resolving one swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// The swing started with the target out of reach.
    Whiff,
    /// The hit roll failed.
    Miss,
    /// Damage landed and the target survived.
    Hit {
        /// Damage dealt.
        damage: u32,
    },
    /// Damage landed and eliminated the target.
    Knockout {
        /// Damage dealt (before clamping).
        damage: u32,
    },
}

/// What a combatant did with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Mid-swing or eliminated; nothing happened.
    Idle,
    /// Closed distance toward the target (or moved by input).
    Advanced,
    /// In range but the weapon is still recovering.
    Waiting,
    /// Started a swing.
    Attacked(AttackOutcome),
}

/// A tournament entrant and its per-tick combat state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combatant {
    id: EntrantId,
    name: String,
    control: Control,
    health: u32,
    weapon: Weapon,
    #[serde(with = "fixed_serde")]
    position: Fixed,
    facing: Facing,
    attacking: bool,
    attack_frame: u32,
    attack_cooldown: u32,
    wins: u32,
    alive: bool,
}

impl Combatant {
    /// Create a combatant at full health, standing at the origin facing right.
    #[must_use]
    pub fn new(id: EntrantId, name: impl Into<String>, control: Control, weapon: Weapon) -> Self {
        Self {
            id,
            name: name.into(),
            control,
            health: MAX_HEALTH,
            weapon,
            position: Fixed::ZERO,
            facing: Facing::Right,
            attacking: false,
            attack_frame: 0,
            attack_cooldown: 0,
            wins: 0,
            alive: true,
        }
    }

    /// Builder: place at `x`.
    #[must_use]
    pub fn at(mut self, x: i32) -> Self {
        self.position = Fixed::from_num(x);
        self
    }

    /// Roster id.
    #[must_use]
    pub const fn id(&self) -> EntrantId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Who drives this combatant.
    #[must_use]
    pub const fn control(&self) -> Control {
        self.control
    }

    /// Whether input intents drive this combatant.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(self.control, Control::Human)
    }

    /// Current health in `0..=MAX_HEALTH`.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        MAX_HEALTH
    }

    /// Assigned weapon.
    #[must_use]
    pub const fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Horizontal position.
    #[must_use]
    pub const fn position(&self) -> Fixed {
        self.position
    }

    /// Facing direction.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether a swing animation is playing.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Frames into the current swing.
    #[must_use]
    pub const fn attack_frame(&self) -> u32 {
        self.attack_frame
    }

    /// Ticks until the weapon can swing again.
    #[must_use]
    pub const fn attack_cooldown(&self) -> u32 {
        self.attack_cooldown
    }

    /// Knockouts scored.
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    /// Whether health is above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Advance animation and cooldown by one tick.
    pub fn update(&mut self) {
        if self.attacking {
            self.attack_frame += 1;
            if self.attack_frame > ATTACK_ANIMATION_TICKS {
                self.attacking = false;
                self.attack_frame = 0;
            }
        }

        if self.attack_cooldown > 0 {
            self.attack_cooldown -= 1;
        }
    }

    /// AI decision for one tick against `target`.
    ///
    /// Closes distance when out of reach, swings when in reach and
    /// recovered, otherwise waits.
    pub fn apply_move<D: RandomSource>(&mut self, target: &mut Combatant, dice: &mut D) -> MoveOutcome {
        if self.attacking || !self.alive {
            return MoveOutcome::Idle;
        }

        if !self.in_reach_of(target) {
            let sign = direction_toward(self.position, target.position);
            self.position += Fixed::from_num(AI_VELOCITY * i32::from(sign));
            self.facing = Facing::from_sign(sign);
            return MoveOutcome::Advanced;
        }

        if self.attack_cooldown > 0 {
            return MoveOutcome::Waiting;
        }

        self.begin_attack(target);
        MoveOutcome::Attacked(self.resolve_strike(target, dice))
    }

    /// Apply one tick of human input against `opponent`.
    ///
    /// Movement is applied whenever the combatant is alive. An attack request
    /// starts a swing only when no swing is playing and the weapon has
    /// recovered; it then resolves with the same roll as an AI swing, or
    /// whiffs if the opponent is out of reach.
    pub fn apply_input_intent<D: RandomSource>(
        &mut self,
        intent: InputIntent,
        opponent: &mut Combatant,
        dice: &mut D,
    ) -> MoveOutcome {
        if !self.alive {
            return MoveOutcome::Idle;
        }

        let mut outcome = MoveOutcome::Idle;

        if intent.move_delta != Fixed::ZERO {
            self.position += intent.move_delta;
            self.facing = if intent.move_delta < Fixed::ZERO {
                Facing::Left
            } else {
                Facing::Right
            };
            outcome = MoveOutcome::Advanced;
        }

        if intent.attack && !self.attacking {
            if self.attack_cooldown > 0 {
                return MoveOutcome::Waiting;
            }
            let in_reach = self.in_reach_of(opponent);
            self.begin_attack(opponent);
            let strike = if in_reach {
                self.resolve_strike(opponent, dice)
            } else {
                AttackOutcome::Whiff
            };
            outcome = MoveOutcome::Attacked(strike);
        }

        outcome
    }

    /// Whether `target` is strictly inside weapon reach.
    #[must_use]
    pub fn in_reach_of(&self, target: &Combatant) -> bool {
        horizontal_distance(self.position, target.position) < self.weapon.reach()
    }

    /// Put the combatant on its starting mark for a new match.
    ///
    /// Clears the swing and cooldown; health and wins carry over.
    pub fn stage(&mut self, x: Fixed, facing: Facing) {
        self.position = x;
        self.facing = facing;
        self.attacking = false;
        self.attack_frame = 0;
        self.attack_cooldown = 0;
    }

    /// Remove `damage` health, clamping at zero.
    ///
    /// Returns true when this blow eliminated the combatant. Blows against an
    /// eliminated combatant change nothing.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    fn begin_attack(&mut self, target: &Combatant) {
        self.attacking = true;
        self.attack_frame = 0;
        self.attack_cooldown = self.weapon.cooldown_ticks();
        self.facing = Facing::from_sign(direction_toward(self.position, target.position));
    }

    fn resolve_strike<D: RandomSource>(&mut self, target: &mut Combatant, dice: &mut D) -> AttackOutcome {
        if dice.roll_percent() >= self.weapon.hit_chance_percent() {
            return AttackOutcome::Miss;
        }

        let damage = self.weapon.damage;
        if target.take_damage(damage) {
            self.wins += 1;
            AttackOutcome::Knockout { damage }
        } else {
            AttackOutcome::Hit { damage }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::test_dice::ScriptedDice;
    use crate::weapons::WeaponKind;

    fn fighter(id: EntrantId, kind: WeaponKind, x: i32) -> Combatant {
        Combatant::new(id, format!("F{id}"), Control::Ai, kind.weapon()).at(x)
    }

    #[test]
    fn test_new_combatant_defaults() {
        let c = fighter(1, WeaponKind::Sword, 0);
        assert_eq!(c.health(), MAX_HEALTH);
        assert!(c.is_alive());
        assert!(!c.is_attacking());
        assert_eq!(c.attack_cooldown(), 0);
        assert_eq!(c.wins(), 0);
        assert_eq!(c.facing(), Facing::Right);
    }

    #[test]
    fn test_update_is_noop_when_idle() {
        let mut c = fighter(1, WeaponKind::Axe, 40);
        let before = c.clone();
        c.update();
        assert_eq!(c, before);
    }

    #[test]
    fn test_update_ends_swing_after_animation_window() {
        let mut a = fighter(1, WeaponKind::Sword, 0);
        let mut b = fighter(2, WeaponKind::Sword, 10);
        let mut dice = ScriptedDice::always(99);
        a.apply_move(&mut b, &mut dice);
        assert!(a.is_attacking());

        for _ in 0..ATTACK_ANIMATION_TICKS {
            a.update();
            assert!(a.is_attacking());
        }
        a.update();
        assert!(!a.is_attacking());
        assert_eq!(a.attack_frame(), 0);
    }

    #[test]
    fn test_update_counts_cooldown_down() {
        let mut a = fighter(1, WeaponKind::Spear, 0);
        let mut b = fighter(2, WeaponKind::Spear, 10);
        let mut dice = ScriptedDice::always(0);
        a.apply_move(&mut b, &mut dice);
        assert_eq!(a.attack_cooldown(), 6);
        for expected in (0..6).rev() {
            a.update();
            assert_eq!(a.attack_cooldown(), expected);
        }
        a.update();
        assert_eq!(a.attack_cooldown(), 0);
    }

    #[test]
    fn test_move_closes_distance_when_out_of_reach() {
        let mut a = fighter(1, WeaponKind::Axe, 700);
        let mut b = fighter(2, WeaponKind::Axe, 200);
        let mut dice = ScriptedDice::always(0);

        let outcome = a.apply_move(&mut b, &mut dice);

        assert_eq!(outcome, MoveOutcome::Advanced);
        assert_eq!(a.position(), Fixed::from_num(695));
        assert_eq!(a.facing(), Facing::Left);
        assert_eq!(b.health(), MAX_HEALTH);
    }

    #[test]
    fn test_reach_is_strict() {
        let a = fighter(1, WeaponKind::Axe, 0);
        assert!(!a.in_reach_of(&fighter(2, WeaponKind::Axe, 50)));
        assert!(a.in_reach_of(&fighter(2, WeaponKind::Axe, 49)));
    }

    #[test]
    fn test_attack_in_reach_lands_on_low_roll() {
        let mut a = fighter(1, WeaponKind::Axe, 100);
        let mut b = fighter(2, WeaponKind::Sword, 60);
        let mut dice = ScriptedDice::always(89);

        let outcome = a.apply_move(&mut b, &mut dice);

        assert_eq!(outcome, MoveOutcome::Attacked(AttackOutcome::Hit { damage: 35 }));
        assert_eq!(b.health(), 65);
        assert!(a.is_attacking());
        assert_eq!(a.attack_cooldown(), 12);
        assert_eq!(a.facing(), Facing::Left);
    }

    #[test]
    fn test_attack_misses_on_high_roll() {
        let mut a = fighter(1, WeaponKind::Axe, 0);
        let mut b = fighter(2, WeaponKind::Sword, 10);
        let mut dice = ScriptedDice::always(90);

        let outcome = a.apply_move(&mut b, &mut dice);

        assert_eq!(outcome, MoveOutcome::Attacked(AttackOutcome::Miss));
        assert_eq!(b.health(), MAX_HEALTH);
        assert_eq!(a.attack_cooldown(), 12);
    }

    #[test]
    fn test_spear_never_misses() {
        let mut a = fighter(1, WeaponKind::Spear, 0);
        let mut b = fighter(2, WeaponKind::Sword, 10);
        let mut dice = ScriptedDice::always(99);
        let outcome = a.apply_move(&mut b, &mut dice);
        assert_eq!(outcome, MoveOutcome::Attacked(AttackOutcome::Hit { damage: 20 }));
    }

    #[test]
    fn test_waits_while_cooling_down() {
        let mut a = fighter(1, WeaponKind::Sword, 0);
        let mut b = fighter(2, WeaponKind::Sword, 10);
        let mut dice = ScriptedDice::always(0);
        a.apply_move(&mut b, &mut dice);

        // Sword cooldown (7) runs out before the swing animation ends.
        a.attacking = false;
        assert_eq!(a.apply_move(&mut b, &mut dice), MoveOutcome::Waiting);
    }

    #[test]
    fn test_idle_while_attacking_or_dead() {
        let mut a = fighter(1, WeaponKind::Sword, 0);
        let mut b = fighter(2, WeaponKind::Sword, 10);
        let mut dice = ScriptedDice::always(0);
        a.apply_move(&mut b, &mut dice);
        assert_eq!(a.apply_move(&mut b, &mut dice), MoveOutcome::Idle);

        let mut dead = fighter(3, WeaponKind::Sword, 0);
        dead.take_damage(MAX_HEALTH);
        let before = dead.clone();
        assert_eq!(dead.apply_move(&mut b, &mut dice), MoveOutcome::Idle);
        assert_eq!(dead, before);
    }

    #[test]
    fn test_lethal_blow_clamps_and_counts_once() {
        let mut a = fighter(1, WeaponKind::Axe, 0);
        let mut b = fighter(2, WeaponKind::Sword, 10);
        b.health = 20;
        let mut dice = ScriptedDice::always(0);

        let outcome = a.apply_move(&mut b, &mut dice);

        assert_eq!(outcome, MoveOutcome::Attacked(AttackOutcome::Knockout { damage: 35 }));
        assert_eq!(b.health(), 0);
        assert!(!b.is_alive());
        assert_eq!(a.wins(), 1);

        // Further blows against the fallen do not add wins.
        a.stage(Fixed::ZERO, Facing::Right);
        a.apply_move(&mut b, &mut dice);
        assert_eq!(a.wins(), 1);
        assert_eq!(b.health(), 0);
    }

    #[test]
    fn test_take_damage_flips_alive_exactly_at_zero() {
        let mut c = fighter(1, WeaponKind::Sword, 0);
        assert!(!c.take_damage(99));
        assert!(c.is_alive());
        assert!(c.take_damage(1));
        assert!(!c.is_alive());
        assert!(!c.take_damage(10));
        assert_eq!(c.health(), 0);
    }

    #[test]
    fn test_input_moves_and_faces() {
        let mut human = Combatant::new(0, "Player", Control::Human, WeaponKind::Sword.weapon()).at(200);
        let mut ai = fighter(1, WeaponKind::Axe, 700);
        let mut dice = ScriptedDice::always(0);

        let outcome = human.apply_input_intent(InputIntent::step(-10), &mut ai, &mut dice);
        assert_eq!(outcome, MoveOutcome::Advanced);
        assert_eq!(human.position(), Fixed::from_num(190));
        assert_eq!(human.facing(), Facing::Left);
    }

    #[test]
    fn test_input_attack_out_of_reach_whiffs() {
        let mut human = Combatant::new(0, "Player", Control::Human, WeaponKind::Sword.weapon()).at(200);
        let mut ai = fighter(1, WeaponKind::Axe, 700);
        let mut dice = ScriptedDice::always(0);

        let outcome = human.apply_input_intent(InputIntent::strike(), &mut ai, &mut dice);

        assert_eq!(outcome, MoveOutcome::Attacked(AttackOutcome::Whiff));
        assert!(human.is_attacking());
        assert_eq!(human.attack_cooldown(), 7);
        assert_eq!(ai.health(), MAX_HEALTH);
    }

    #[test]
    fn test_input_attack_in_reach_resolves_roll() {
        let mut human = Combatant::new(0, "Player", Control::Human, WeaponKind::Sword.weapon()).at(200);
        let mut ai = fighter(1, WeaponKind::Axe, 240);
        let mut dice = ScriptedDice::always(0);

        let outcome = human.apply_input_intent(InputIntent::strike(), &mut ai, &mut dice);

        assert_eq!(outcome, MoveOutcome::Attacked(AttackOutcome::Hit { damage: 25 }));
        assert_eq!(ai.health(), 75);

        // Mid-swing presses are ignored.
        let again = human.apply_input_intent(InputIntent::strike(), &mut ai, &mut dice);
        assert_eq!(again, MoveOutcome::Idle);
        assert_eq!(ai.health(), 75);
    }

    #[test]
    fn test_input_attack_waits_for_cooldown_after_swing_ends() {
        let mut human = Combatant::new(0, "Player", Control::Human, WeaponKind::Sword.weapon()).at(200);
        let mut ai = fighter(1, WeaponKind::Axe, 240);
        let mut dice = ScriptedDice::always(0);
        human.apply_input_intent(InputIntent::strike(), &mut ai, &mut dice);
        assert_eq!(ai.health(), 75);

        human.attacking = false;
        human.attack_cooldown = 3;
        let outcome = human.apply_input_intent(InputIntent::strike(), &mut ai, &mut dice);

        assert_eq!(outcome, MoveOutcome::Waiting);
        assert!(!human.is_attacking());
        assert_eq!(human.attack_cooldown(), 3);
        assert_eq!(ai.health(), 75);
    }

    #[test]
    fn test_stage_resets_swing_but_keeps_health() {
        let mut a = fighter(1, WeaponKind::Sword, 0);
        let mut b = fighter(2, WeaponKind::Sword, 10);
        let mut dice = ScriptedDice::always(0);
        a.apply_move(&mut b, &mut dice);

        b.stage(Fixed::from_num(710), Facing::Left);
        a.stage(Fixed::from_num(210), Facing::Right);

        assert!(!a.is_attacking());
        assert_eq!(a.attack_cooldown(), 0);
        assert_eq!(b.health(), 75);
        assert_eq!(b.position(), Fixed::from_num(710));
    }
}
