//! Hosting: sessions, timers and the game registry.
//!
//! The engine is pure; this layer is where time passes. A
//! [`GameSession`] holds the committed state of one game and turns clock
//! readings into timer inputs. A [`GameRegistry`] holds many sessions.

pub mod game;
pub mod inactivity;
pub mod registry;

pub use game::{GameId, GameSession};
pub use inactivity::{obligation, AuctionTimer, InactivityTracker, Obligation, ObligationKey};
pub use registry::GameRegistry;

use crate::core::{EngineError, Rejection};

/// Errors from a single session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a game needs 2-4 players, got {0}")]
    PlayerCount(usize),
    #[error("action rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Errors from the registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown game {0}")]
    UnknownGame(GameId),
    #[error(transparent)]
    Session(#[from] SessionError),
}
