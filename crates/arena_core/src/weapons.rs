//! Weapon catalog.
//!
//! Three immutable weapons. Speed trades against damage: faster weapons
//! recover sooner and land more often, slower ones hit harder.

use serde::{Deserialize, Serialize};

use crate::math::Fixed;
use crate::rng::RandomSource;

/// Tick budget the cooldown formula divides by speed.
pub const COOLDOWN_BASE_TICKS: u32 = 60;

/// Hit chance, in percent, at the reference speed.
pub const BASE_HIT_PERCENT: i64 = 90;

/// Speed at which the base hit chance applies.
pub const REFERENCE_SPEED: i64 = 5;

/// Hit chance gained (or lost) per point of speed away from the reference.
pub const HIT_PERCENT_PER_SPEED: i64 = 2;

/// Weapon identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Balanced blade.
    Sword,
    /// Slow, heavy, short reach.
    Axe,
    /// Fast, light, long reach.
    Spear,
}

impl WeaponKind {
    /// All catalog entries in catalog order.
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Sword, WeaponKind::Axe, WeaponKind::Spear];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            WeaponKind::Sword => "Sword",
            WeaponKind::Axe => "Axe",
            WeaponKind::Spear => "Spear",
        }
    }

    /// Catalog stats for this weapon.
    #[must_use]
    pub const fn weapon(self) -> Weapon {
        match self {
            WeaponKind::Sword => Weapon {
                kind: self,
                damage: 25,
                speed: 8,
                range: 60,
            },
            WeaponKind::Axe => Weapon {
                kind: self,
                damage: 35,
                speed: 5,
                range: 50,
            },
            WeaponKind::Spear => Weapon {
                kind: self,
                damage: 20,
                speed: 10,
                range: 80,
            },
        }
    }
}

/// Immutable weapon record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weapon {
    /// Which catalog entry this is.
    pub kind: WeaponKind,
    /// Health removed by a landed blow.
    pub damage: u32,
    /// Attack speed; the cooldown is its inverse.
    pub speed: u32,
    /// Reach in arena units. Targets strictly closer than this are in range.
    pub range: u32,
}

/// The fixed weapon catalog.
pub const CATALOG: [Weapon; 3] = [
    WeaponKind::Sword.weapon(),
    WeaponKind::Axe.weapon(),
    WeaponKind::Spear.weapon(),
];

impl Weapon {
    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Ticks between swings: `floor(60 / speed)`.
    #[must_use]
    pub const fn cooldown_ticks(&self) -> u32 {
        if self.speed == 0 {
            return COOLDOWN_BASE_TICKS;
        }
        COOLDOWN_BASE_TICKS / self.speed
    }

    /// Hit chance in whole percent: `90 + (speed - 5) * 2`, clamped to 0..=100.
    #[must_use]
    pub fn hit_chance_percent(&self) -> u32 {
        let percent =
            BASE_HIT_PERCENT + (self.speed as i64 - REFERENCE_SPEED) * HIT_PERCENT_PER_SPEED;
        percent.clamp(0, 100) as u32
    }

    /// Hit chance as a fraction in `0..=1`.
    #[must_use]
    pub fn hit_chance(&self) -> Fixed {
        Fixed::from_num(self.hit_chance_percent()) / Fixed::from_num(100)
    }

    /// Reach as a fixed-point distance.
    #[must_use]
    pub fn reach(&self) -> Fixed {
        Fixed::from_num(self.range)
    }

    /// Draw a catalog weapon uniformly at random.
    pub fn draw<D: RandomSource>(dice: &mut D) -> Self {
        CATALOG[dice.pick_index(CATALOG.len())]
    }
}
