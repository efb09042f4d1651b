//! Pilots for the human seat.
//!
//! Without a keyboard the human entrant still needs input each tick. A
//! [`Pilot`] describes where that input comes from; a [`PilotExecutor`]
//! turns it into one [`InputIntent`] per tick.

use arena_core::combatant::{Combatant, InputIntent, AI_VELOCITY};
use arena_core::math::direction_toward;
use arena_core::rng::RandomSource;
use arena_core::tournament::Tournament;
use serde::{Deserialize, Serialize};

/// Source of input for the human entrant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pilot {
    /// Close in and swing using the same rule as AI entrants.
    #[default]
    Autopilot,
    /// Never move, never swing.
    Idle,
    /// Replay these intents in order, then idle.
    Scripted(Vec<InputIntent>),
}

impl Pilot {
    /// Look up a pilot by CLI name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "autopilot" | "auto" => Some(Pilot::Autopilot),
            "idle" => Some(Pilot::Idle),
            _ => None,
        }
    }

    /// Short name for reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Pilot::Autopilot => "autopilot",
            Pilot::Idle => "idle",
            Pilot::Scripted(_) => "scripted",
        }
    }
}

/// Produces intents for one tournament.
#[derive(Debug, Clone)]
pub struct PilotExecutor {
    pilot: Pilot,
    cursor: usize,
}

impl PilotExecutor {
    /// Create a new executor for a pilot.
    #[must_use]
    pub fn new(pilot: Pilot) -> Self {
        Self { pilot, cursor: 0 }
    }

    /// Intent for the coming tick of `tournament`.
    ///
    /// Returns [`InputIntent::IDLE`] when the human is not in the staged
    /// match. A script only advances on ticks of the human's own matches.
    pub fn next_intent<R: RandomSource>(&mut self, tournament: &Tournament<R>) -> InputIntent {
        match &self.pilot {
            Pilot::Idle => InputIntent::IDLE,
            Pilot::Scripted(intents) => {
                if human_and_opponent(tournament).is_none() {
                    return InputIntent::IDLE;
                }
                let intent = intents.get(self.cursor).copied().unwrap_or(InputIntent::IDLE);
                self.cursor += 1;
                intent
            }
            Pilot::Autopilot => match human_and_opponent(tournament) {
                Some((me, opponent)) => autopilot(me, opponent),
                None => InputIntent::IDLE,
            },
        }
    }
}

fn human_and_opponent<R: RandomSource>(tournament: &Tournament<R>) -> Option<(&Combatant, &Combatant)> {
    let active = tournament.active_match()?;
    let me = tournament.human()?;
    if !active.involves(me.id()) {
        return None;
    }
    let opponent_id = if active.left == me.id() { active.right } else { active.left };
    Some((me, tournament.combatant(opponent_id)?))
}

fn autopilot(me: &Combatant, opponent: &Combatant) -> InputIntent {
    if me.is_attacking() {
        return InputIntent::IDLE;
    }
    if me.in_reach_of(opponent) {
        return InputIntent::strike();
    }
    let sign = direction_toward(me.position(), opponent.position());
    InputIntent::step(AI_VELOCITY * i32::from(sign))
}
