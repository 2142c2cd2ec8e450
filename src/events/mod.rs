//! The append-only event log.
//!
//! [`GameEvent`] is a tagged sum type; consumers match it exhaustively so
//! that adding a variant is a compile error everywhere it matters.

mod event;

pub use event::GameEvent;
