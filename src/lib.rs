//! # monopoly-engine
//!
//! A deterministic, replayable engine for a turn-based property-trading
//! board game for 2-4 players.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: `(state, input, dice) -> state'`. The engine
//!    never reads a clock and never touches global state. Randomness comes
//!    in through a [`DiceSource`].
//!
//! 2. **Rejections are values**: an illegal input returns the untouched
//!    state plus a [`Rejection`]. Only broken invariants surface as
//!    [`EngineError`].
//!
//! 3. **Replayable**: every applied input is appended to the state's
//!    history with the dice it consumed, so [`rules::replay`] rebuilds the
//!    same state from the starting position.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im` vectors and maps make cloning a
//!   [`GameState`] cheap, so each transition edits a private copy.
//!
//! - **Static board**: the 40 tiles live in an immutable [`Board`] shared
//!   behind an `Arc`; state refers to tiles only by [`TileId`].
//!
//! ## Modules
//!
//! - `board`: tiles, groups, prices and rent tables
//! - `cards`: community chest and chance decks
//! - `core`: players, state, actions, dice, configuration, errors
//! - `engine`: the sub-engines (turns, tiles, property, auction, debt, trade, voteout)
//! - `events`: the ordered log of what happened
//! - `rules`: the [`RulesEngine`] facade and replay
//! - `session`: hosting, timers and the game registry

pub mod board;
pub mod cards;
pub mod core;
pub mod engine;
pub mod events;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::board::{Board, Group, TileId};

pub use crate::core::{
    Action, Input, InputRecord,
    Millis, RulesConfig, PurchaseMode, TimerConfig,
    EngineError, Rejection,
    PlayerId, PlayerState,
    DiceRoll, DiceSource, GameRng, ScriptedDice, SecureDice,
    GameState, PendingAction, TurnPhase,
};

pub use crate::engine::trade::{TradeId, TradeOffer, TradeTerms};

pub use crate::events::GameEvent;

pub use crate::rules::{GameResult, Monopoly, RulesEngine, Step};

pub use crate::session::{GameId, GameRegistry, GameSession, RegistryError, SessionError};
