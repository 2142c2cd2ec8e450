//! One running game.
//!
//! A `GameSession` owns the committed state, the dice and the timers. It
//! is the only place a `GameState` is replaced, one input at a time.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::inactivity::{AuctionTimer, InactivityTracker};
use super::SessionError;
use crate::core::{
    Action, DiceSource, GameState, Input, Millis, PlayerId, MAX_PLAYERS, MIN_PLAYERS,
};
use crate::events::GameEvent;
use crate::rules::{GameResult, Monopoly, RulesEngine};

/// Identifier of a game within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game-{}", self.0)
    }
}

/// A game in progress.
pub struct GameSession {
    id: GameId,
    rules: Monopoly,
    state: GameState,
    dice: Box<dyn DiceSource + Send>,
    inactivity: InactivityTracker,
    auction_timer: AuctionTimer,
}

impl GameSession {
    /// Seat `names` and start the clocks at `now`.
    pub fn new<S: AsRef<str>>(
        id: GameId,
        rules: Monopoly,
        names: &[S],
        dice: Box<dyn DiceSource + Send>,
        now: Millis,
    ) -> Result<Self, SessionError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(SessionError::PlayerCount(names.len()));
        }

        let state = rules.new_game(names)?;
        let inactivity = InactivityTracker::new(&state, now);
        info!(%id, players = names.len(), "game started");

        Ok(Self {
            id,
            rules,
            state,
            dice,
            inactivity,
            auction_timer: AuctionTimer::default(),
        })
    }

    /// Get the game ID.
    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    /// The committed state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The rules in force.
    #[must_use]
    pub fn rules(&self) -> &Monopoly {
        &self.rules
    }

    /// Final result, once someone has won.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.rules.is_terminal(&self.state)
    }

    /// Actions `player` could take right now.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        self.rules.legal_actions(&self.state, player)
    }

    /// Apply one input and return the events it produced.
    fn commit(&mut self, input: &Input) -> Result<Vec<GameEvent>, SessionError> {
        let step = self.rules.apply_input(&self.state, input, self.dice.as_mut())?;
        if let Some(rejection) = step.rejection {
            return Err(rejection.into());
        }

        let before = self.state.events.len();
        self.state = step.state;
        Ok(self.state.events_since(before).cloned().collect())
    }

    /// Apply a player action received at `now`.
    pub fn apply(
        &mut self,
        player: PlayerId,
        action: Action,
        now: Millis,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let events = self.commit(&Input::Player { player, action })?;
        self.inactivity.touch(player, now);
        self.inactivity.observe(&self.state, now);
        self.auction_timer.observe(&self.state, now);
        Ok(events)
    }

    /// Fire every timer due at `now` and return the events produced.
    ///
    /// Stale firings are dropped; only fatal errors are returned.
    pub fn tick(&mut self, now: Millis) -> Result<Vec<GameEvent>, SessionError> {
        let timers = self.rules.config().timers;
        let mut events = Vec::new();

        let due = [
            self.auction_timer.poll(&self.state, now, &timers),
            self.inactivity.poll(&self.state, now, &timers),
        ];
        for input in due.into_iter().flatten() {
            match self.commit(&input) {
                Ok(produced) => events.extend(produced),
                Err(SessionError::Rejected(rejection)) => {
                    debug!(id = %self.id, ?input, %rejection, "stale timer dropped");
                }
                Err(err) => return Err(err),
            }
        }

        self.inactivity.observe(&self.state, now);
        Ok(events)
    }

    /// Encode the committed state as a binary snapshot.
    pub fn snapshot(&self) -> Result<Vec<u8>, SessionError> {
        Ok(self.state.encode()?)
    }

    /// Replace the committed state with a decoded snapshot.
    pub fn restore(&mut self, bytes: &[u8], now: Millis) -> Result<(), SessionError> {
        let state = GameState::decode(bytes)?;
        if state.player_count() != self.state.player_count() {
            return Err(SessionError::PlayerCount(state.player_count()));
        }
        self.inactivity = InactivityTracker::new(&state, now);
        self.auction_timer = AuctionTimer::default();
        self.state = state;
        Ok(())
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("turn", &self.state.turn_number)
            .field("watching", &self.inactivity.watching())
            .finish_non_exhaustive()
    }
}
