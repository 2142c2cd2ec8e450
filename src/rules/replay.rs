//! Deterministic replay.
//!
//! Every applied input is stored in `GameState::history` along with the
//! dice it consumed. Feeding that history back into the same rules from
//! the same initial state reproduces the game exactly, event for event.

use tracing::debug;

use super::engine::RulesEngine;
use crate::core::{DiceRoll, DiceSource, EngineError, GameState, InputRecord};

/// Hands out the one recorded roll of an input.
///
/// An input that rolls without a recorded roll gets a placeholder; the
/// mismatch is then caught by comparing the new record with the old.
struct RecordedDice {
    roll: Option<DiceRoll>,
}

impl DiceSource for RecordedDice {
    fn roll(&mut self) -> DiceRoll {
        self.roll.take().unwrap_or(DiceRoll { die1: 1, die2: 1 })
    }
}

/// Re-apply `history` on top of `initial`.
///
/// Fails with [`EngineError::ReplayDiverged`] if an input is rejected or
/// consumes different dice than recorded.
pub fn replay<R: RulesEngine + ?Sized>(
    rules: &R,
    initial: &GameState,
    history: &[InputRecord],
) -> Result<GameState, EngineError> {
    let mut state = initial.clone();

    for (index, record) in history.iter().enumerate() {
        let mut dice = RecordedDice { roll: record.dice };
        let step = rules.apply_input(&state, &record.input, &mut dice)?;

        if let Some(rejection) = step.rejection {
            return Err(EngineError::ReplayDiverged { index, reason: rejection.to_string() });
        }
        let rolled = step.state.history.back().and_then(|r| r.dice);
        if rolled != record.dice {
            return Err(EngineError::ReplayDiverged {
                index,
                reason: format!("dice mismatch: recorded {:?}, rolled {:?}", record.dice, rolled),
            });
        }

        state = step.state;
    }

    debug!(inputs = history.len(), "replay complete");
    Ok(state)
}
