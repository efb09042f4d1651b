//! Read-only tournament views for presentation layers.
//!
//! Positions are converted to `f64` here and nowhere else; the simulation
//! itself stays in fixed point.

use serde::{Deserialize, Serialize};

use crate::bracket::{BracketPhase, Match};
use crate::combatant::{Combatant, Control, EntrantId, Facing};
use crate::rng::RandomSource;
use crate::tournament::Tournament;
use crate::weapons::WeaponKind;

/// Health gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    /// Current health.
    pub current: u32,
    /// Maximum health.
    pub max: u32,
}

/// One entrant as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    /// Entrant id.
    pub id: EntrantId,
    /// Display name.
    pub name: String,
    /// Human or AI seat.
    pub control: Control,
    /// Weapon carried.
    pub weapon: WeaponKind,
    /// Horizontal position.
    pub x: f64,
    /// Direction faced.
    pub facing: Facing,
    /// Health gauge.
    pub health: HealthState,
    /// Mid-swing.
    pub attacking: bool,
    /// Frames into the current swing.
    pub attack_frame: u32,
    /// Matches won so far.
    pub wins: u32,
    /// Still standing.
    pub alive: bool,
}

impl CombatantSnapshot {
    /// Capture `combatant`.
    #[must_use]
    pub fn capture(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id(),
            name: combatant.name().to_string(),
            control: combatant.control(),
            weapon: combatant.weapon().kind,
            x: combatant.position().to_num::<f64>(),
            facing: combatant.facing(),
            health: HealthState {
                current: combatant.health(),
                max: combatant.max_health(),
            },
            attacking: combatant.is_attacking(),
            attack_frame: combatant.attack_frame(),
            wins: combatant.wins(),
            alive: combatant.is_alive(),
        }
    }
}

/// A bracket pairing with its outcome so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Left seat.
    pub left: EntrantId,
    /// Right seat.
    pub right: EntrantId,
    /// Survivor, once exactly one side is down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<EntrantId>,
}

/// Whole-tournament view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    /// Match ticks stepped so far.
    pub tick: u64,
    /// Bracket lifecycle phase.
    pub phase: BracketPhase,
    /// Index of the round being played.
    pub current_round: usize,
    /// Pairings per round; rounds not yet reached are empty.
    pub rounds: Vec<Vec<MatchSnapshot>>,
    /// Match currently staged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Match>,
    /// Every entrant, in roster order.
    pub roster: Vec<CombatantSnapshot>,
    /// Champion, once crowned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<EntrantId>,
    /// Entry fees collected, in cents.
    pub prize_pool_cents: u64,
}

impl TournamentSnapshot {
    /// Capture `tournament`.
    #[must_use]
    pub fn capture<R: RandomSource>(tournament: &Tournament<R>) -> Self {
        let is_alive = |id: EntrantId| tournament.combatant(id).is_some_and(Combatant::is_alive);
        let rounds = tournament
            .bracket()
            .rounds()
            .iter()
            .map(|round| {
                round
                    .iter()
                    .map(|m| MatchSnapshot {
                        left: m.left,
                        right: m.right,
                        winner: m.winner(is_alive),
                    })
                    .collect()
            })
            .collect();

        Self {
            tick: tournament.tick(),
            phase: tournament.phase(),
            current_round: tournament.current_round(),
            rounds,
            active: tournament.active_match(),
            roster: tournament
                .roster()
                .iter()
                .map(CombatantSnapshot::capture)
                .collect(),
            champion: tournament.champion().map(Combatant::id),
            prize_pool_cents: tournament.prize_pool_cents(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::InputIntent;
    use crate::config::TournamentConfig;

    #[test]
    fn test_snapshot_mirrors_fresh_tournament() {
        let t = Tournament::seeded(&TournamentConfig::default(), 3).unwrap();
        let snap = t.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.roster.len(), 8);
        assert_eq!(snap.rounds.len(), 3);
        assert_eq!(snap.rounds[0].len(), 4);
        assert!(snap.rounds[0].iter().all(|m| m.winner.is_none()));
        assert!(snap.active.is_none());
        assert_eq!(snap.prize_pool_cents, 8_000);
        assert_eq!(snap.roster[0].control, Control::Human);
    }

    #[test]
    fn test_snapshot_tracks_staged_match() {
        let mut t = Tournament::seeded(&TournamentConfig::default(), 3).unwrap();
        t.start_next_fight();
        t.step(InputIntent::IDLE);
        let snap = t.snapshot();
        let active = snap.active.unwrap();
        let left = snap.roster.iter().find(|c| c.id == active.left).unwrap();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.phase, BracketPhase::MatchActive);
        assert_eq!(left.health.max, 100);
        assert!(left.x >= 210.0);
    }
}
