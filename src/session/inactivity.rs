//! Timers: idle players and stalled auctions.
//!
//! ## Obligations
//!
//! At any moment at most one player is holding up the game. The
//! [`Obligation`] names that player and what they owe. The key changes
//! whenever progress is made, which restarts the clock.
//!
//! | situation           | obligated player  | key            |
//! |---------------------|-------------------|----------------|
//! | buy prompt open     | prompted player   | `ResolveBuy`   |
//! | auction open        | nobody            |                |
//! | open debt           | debtor            | `ResolveDebt`  |
//! | turn not yet rolled | current player    | `Roll`         |
//! | turn rolled         | current player    | `EndTurn`      |
//!
//! Timers only propose inputs. The engine re-validates each one, so a
//! firing that lost a race with a player action is rejected harmlessly.

use serde::{Deserialize, Serialize};

use crate::board::TileId;
use crate::core::{GameState, Input, Millis, PendingAction, PlayerId, TimerConfig, TurnPhase};

/// What the obligated player has to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObligationKey {
    Roll { turn: u32 },
    EndTurn { turn: u32 },
    ResolveBuy { tile: TileId, turn: u32 },
    ResolveDebt { amount: i64 },
}

/// The player holding up the game, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obligation {
    pub player: PlayerId,
    pub key: ObligationKey,
}

/// Derive who the game is waiting on.
#[must_use]
pub fn obligation(state: &GameState) -> Option<Obligation> {
    if state.is_over() {
        return None;
    }

    match state.pending_action {
        Some(PendingAction::BuyProperty { tile, player }) => {
            return Some(Obligation {
                player,
                key: ObligationKey::ResolveBuy { tile, turn: state.turn_number },
            });
        }
        Some(PendingAction::Auction(_)) => return None,
        None => {}
    }

    if let Some(debtor) = state.debtor() {
        let amount = state.player(debtor).and_then(|p| p.debt).map_or(0, |d| d.amount);
        return Some(Obligation { player: debtor, key: ObligationKey::ResolveDebt { amount } });
    }

    let player = state.current_player().ok()?;
    let turn = state.turn_number;
    let key = match state.turn_phase {
        TurnPhase::AwaitingRoll => ObligationKey::Roll { turn },
        TurnPhase::AwaitingEndTurn => ObligationKey::EndTurn { turn },
    };
    Some(Obligation { player, key })
}

/// Watches the current obligation and fires the warning and the vote.
#[derive(Clone, Debug, Default)]
pub struct InactivityTracker {
    watching: Option<Obligation>,
    since: Millis,
    warned: bool,
    vote_opened: bool,
}

impl InactivityTracker {
    /// Start watching `state` at `now`.
    #[must_use]
    pub fn new(state: &GameState, now: Millis) -> Self {
        Self {
            watching: obligation(state),
            since: now,
            warned: false,
            vote_opened: false,
        }
    }

    /// The obligation being timed.
    #[must_use]
    pub fn watching(&self) -> Option<Obligation> {
        self.watching
    }

    /// Restart the clock if the obligation changed.
    pub fn observe(&mut self, state: &GameState, now: Millis) {
        let current = obligation(state);
        if current != self.watching {
            self.watching = current;
            self.restart(now);
        }
    }

    /// Restart the clock if `player` is the one being waited on.
    pub fn touch(&mut self, player: PlayerId, now: Millis) {
        if self.watching.is_some_and(|o| o.player == player) {
            self.restart(now);
        }
    }

    fn restart(&mut self, now: Millis) {
        self.since = now;
        self.warned = false;
        self.vote_opened = false;
    }

    /// Observe `state` and return the next timer input due at `now`, if
    /// any. Each timer fires once per obligation.
    pub fn poll(&mut self, state: &GameState, now: Millis, timers: &TimerConfig) -> Option<Input> {
        self.observe(state, now);
        let player = self.watching?.player;

        if !self.vote_opened && now >= self.since.after(timers.voteout_delay_ms) {
            self.vote_opened = true;
            self.warned = true;
            return Some(Input::OpenVoteout { target: player, at: now });
        }
        if !self.warned && now >= self.since.after(timers.warning_delay_ms) {
            self.warned = true;
            return Some(Input::InactivityWarning { player });
        }
        None
    }
}

/// Countdown for the open auction. Any bid or pass restarts it.
#[derive(Clone, Debug, Default)]
pub struct AuctionTimer {
    watching: Option<(TileId, i64, usize)>,
    since: Millis,
}

impl AuctionTimer {
    /// Restart the countdown if the auction changed.
    pub fn observe(&mut self, state: &GameState, now: Millis) {
        let current = state.auction().map(|a| (a.tile, a.highest_bid, a.active_bidders.len()));
        if current != self.watching {
            self.watching = current;
            self.since = now;
        }
    }

    /// Return `AuctionTimeout` once the auction has been quiet long enough.
    pub fn poll(&mut self, state: &GameState, now: Millis, timers: &TimerConfig) -> Option<Input> {
        self.observe(state, now);
        self.watching?;
        if now >= self.since.after(timers.auction_timeout_ms) {
            self.since = now;
            return Some(Input::AuctionTimeout);
        }
        None
    }
}
