//! Card decks drawn in fixed rotation.
//!
//! Decks are part of game state. Drawing never removes or reshuffles a
//! card: the draw index simply advances modulo the deck length, so the
//! sequence of draws is fully determined by the initial order.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::TileId;

/// Which deck a card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeckKind {
    CommunityChest,
    Chance,
}

/// What a card does to the player who drew it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Receive money from the bank.
    Collect(i64),
    /// Pay money to the bank.
    Pay(i64),
    /// Move forward to a tile, collecting the GO bonus on wraparound,
    /// then resolve that tile.
    AdvanceTo(TileId),
    /// Go directly to jail.
    GoToJail,
}

/// A single card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub text: String,
    pub effect: CardEffect,
}

impl Card {
    /// Create a new card.
    pub fn new(text: impl Into<String>, effect: CardEffect) -> Self {
        Self { text: text.into(), effect }
    }
}

/// A fixed-order deck with a rotating draw index.
///
/// ## Example
///
/// ```
/// use monopoly_engine::cards::{Card, CardEffect, Deck};
///
/// let mut deck = Deck::new(vec![
///     Card::new("A", CardEffect::Collect(10)),
///     Card::new("B", CardEffect::Pay(10)),
/// ]);
///
/// assert_eq!(deck.draw().map(|(i, _)| i), Some(0));
/// assert_eq!(deck.draw().map(|(i, _)| i), Some(1));
/// assert_eq!(deck.draw().map(|(i, _)| i), Some(0)); // wraps
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
    next: usize,
}

impl Deck {
    /// Create a deck drawing from the first card.
    #[must_use]
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            next: 0,
        }
    }

    /// Index of the card the next draw returns.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw the next card, advancing the index cyclically.
    ///
    /// Returns the drawn index and card, or `None` for an empty deck.
    pub fn draw(&mut self) -> Option<(usize, Card)> {
        let index = self.next;
        let card = self.cards.get(index)?.clone();
        self.next = (index + 1) % self.cards.len();
        Some((index, card))
    }

    /// The classic community chest deck.
    #[must_use]
    pub fn community_chest() -> Self {
        use CardEffect::*;

        Self::new([
            Card::new("Advance to Go (Collect $200)", AdvanceTo(TileId::GO)),
            Card::new("Bank error in your favor. Collect $200", Collect(200)),
            Card::new("Doctor's fee. Pay $50", Pay(50)),
            Card::new("From sale of stock you get $50", Collect(50)),
            Card::new("Go to Jail. Do not pass Go, do not collect $200", GoToJail),
            Card::new("Holiday fund matures. Receive $100", Collect(100)),
            Card::new("Income tax refund. Collect $20", Collect(20)),
            Card::new("Life insurance matures. Collect $100", Collect(100)),
            Card::new("Pay hospital fees of $100", Pay(100)),
            Card::new("Pay school fees of $50", Pay(50)),
            Card::new("Receive $25 consultancy fee", Collect(25)),
            Card::new("You have won second prize in a beauty contest. Collect $10", Collect(10)),
            Card::new("You inherit $100", Collect(100)),
        ])
    }

    /// The classic chance deck, limited to the effects modeled above.
    #[must_use]
    pub fn chance() -> Self {
        use CardEffect::*;

        Self::new([
            Card::new("Advance to Boardwalk", AdvanceTo(TileId::new(39))),
            Card::new("Advance to Go (Collect $200)", AdvanceTo(TileId::GO)),
            Card::new("Advance to Illinois Avenue", AdvanceTo(TileId::new(24))),
            Card::new("Advance to St. Charles Place", AdvanceTo(TileId::new(11))),
            Card::new("Bank pays you dividend of $50", Collect(50)),
            Card::new("Go to Jail. Do not pass Go, do not collect $200", GoToJail),
            Card::new("Speeding fine $15", Pay(15)),
            Card::new("Take a trip to Reading Railroad", AdvanceTo(TileId::new(5))),
            Card::new("Your building loan matures. Collect $150", Collect(150)),
        ])
    }
}
