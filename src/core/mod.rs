//! Core engine types: players, state, actions, dice, configuration, errors.
//!
//! Everything here is plain data plus small helpers. The rules that move a
//! `GameState` forward live in [`crate::engine`]; the public entry point is
//! [`crate::rules::Monopoly`].

pub mod action;
pub mod clock;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, Input, InputRecord};
pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use config::{PurchaseMode, RulesConfig, TimerConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{EngineError, Rejection, RuleError, RuleResult};
pub use player::{DebtCause, DebtResolution, PlayerId, PlayerState};
pub use rng::{DiceRoll, DiceSource, GameRng, GameRngState, ScriptedDice, SecureDice};
pub use state::{AuctionState, GameState, PendingAction, PropertyOwnership, TurnPhase, Voteout};
