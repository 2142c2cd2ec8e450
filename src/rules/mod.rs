//! Rules facade.
//!
//! [`RulesEngine`] is the seam between the engine and its hosts:
//! - Legal actions for each game state
//! - How inputs move the state forward
//! - Win detection
//!
//! [`Monopoly`] implements it by dispatching to [`crate::engine`];
//! [`replay`] re-runs a recorded history through any implementation.

pub mod engine;
pub mod monopoly;
pub mod replay;

pub use engine::{GameResult, RulesEngine, Step};
pub use monopoly::Monopoly;
pub use replay::replay;
