//! Rules engine trait.
//!
//! A `RulesEngine` defines:
//! - What actions are legal
//! - How inputs move the state forward
//! - When the game is over
//!
//! Transitions are pure: the input state is never touched and a new state
//! is returned. A rejected input returns the input state unchanged.

use crate::board::Board;
use crate::core::{
    Action, DiceSource, EngineError, GameState, Input, PlayerId, Rejection, RulesConfig,
};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// Last player standing.
    pub winner: PlayerId,
    /// Turn on which the game ended.
    pub turns: u32,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == player
    }
}

/// Outcome of one transition attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// The new state, or the input state when rejected.
    pub state: GameState,
    /// Why the input was refused, if it was.
    pub rejection: Option<Rejection>,
}

impl Step {
    /// A committed transition.
    #[must_use]
    pub fn applied(state: GameState) -> Self {
        Self { state, rejection: None }
    }

    /// A refused input.
    #[must_use]
    pub fn rejected(state: GameState, rejection: Rejection) -> Self {
        Self { state, rejection: Some(rejection) }
    }

    /// Whether the input was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.rejection.is_none()
    }

    /// Turn a rejection into an error, keeping the state otherwise.
    pub fn into_result(self) -> Result<GameState, Rejection> {
        match self.rejection {
            None => Ok(self.state),
            Some(rejection) => Err(rejection),
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply_input`: must be deterministic given the dice it draws
/// - `legal_actions`: every listed action must be accepted by `apply_action`
/// - `is_terminal`: return `None` while the game continues
pub trait RulesEngine {
    /// Rule constants.
    fn config(&self) -> &RulesConfig;

    /// The board being played on.
    fn board(&self) -> &Board;

    /// Apply any input: a player action or a timer firing.
    ///
    /// `Err` only for fatal errors; validation failures come back as a
    /// [`Step`] carrying the rejection.
    fn apply_input(
        &self,
        state: &GameState,
        input: &Input,
        dice: &mut dyn DiceSource,
    ) -> Result<Step, EngineError>;

    /// Enumerate the actions `player` could take right now.
    ///
    /// Trades are open-ended and never listed as proposals.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Apply a player action.
    fn apply_action(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &Action,
        dice: &mut dyn DiceSource,
    ) -> Result<Step, EngineError> {
        let input = Input::Player { player, action: action.clone() };
        self.apply_input(state, &input, dice)
    }

    /// Check whether `action` would currently be accepted.
    fn is_legal(&self, state: &GameState, player: PlayerId, action: &Action) -> bool {
        self.legal_actions(state, player).contains(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult { winner: PlayerId::new(1), turns: 40 };
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_step_into_result() {
        let state = GameState::new(&["a", "b"], &RulesConfig::default()).unwrap();

        let ok = Step::applied(state.clone());
        assert!(ok.is_applied());
        assert_eq!(ok.into_result(), Ok(state.clone()));

        let refused = Step::rejected(state, Rejection::NoAuction);
        assert!(!refused.is_applied());
        assert_eq!(refused.into_result(), Err(Rejection::NoAuction));
    }
}
