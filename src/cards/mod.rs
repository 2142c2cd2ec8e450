//! Community chest and chance cards.
//!
//! - [`Card`]: text plus a [`CardEffect`]
//! - [`Deck`]: fixed-order sequence drawn by rotation

mod deck;

pub use deck::{Card, CardEffect, Deck, DeckKind};
