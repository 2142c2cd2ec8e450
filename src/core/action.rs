//! Action representation.
//!
//! An [`Action`] is what a player asks the engine to do. An [`Input`] is
//! anything that drives a transition: a player action or a timer firing.
//! Every applied input is kept as an [`InputRecord`] together with the
//! dice it consumed, which is enough to replay a game exactly.

use serde::{Deserialize, Serialize};

use super::clock::Millis;
use super::player::PlayerId;
use super::rng::DiceRoll;
use crate::board::TileId;
use crate::engine::trade::{TradeId, TradeTerms};

/// A player action.
///
/// ## Example
///
/// ```
/// use monopoly_engine::board::TileId;
/// use monopoly_engine::core::Action;
///
/// let build = Action::BuildHouse { tile: TileId::new(39) };
/// let json = serde_json::to_string(&build).unwrap();
/// assert_eq!(json, r#"{"BUILD_HOUSE":{"tile":39}}"#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    RollDice,
    EndTurn,
    PayJailFine,
    BuyProperty,
    SkipProperty,
    BuildHouse { tile: TileId },
    BreakHouse { tile: TileId },
    SellProperty { tile: TileId },
    Mortgage { tile: TileId },
    Unmortgage { tile: TileId },
    PlaceBid { amount: i64 },
    PassAuction,
    ProposeTrade { to: PlayerId, terms: TradeTerms },
    AcceptTrade { trade_id: TradeId },
    RejectTrade { trade_id: TradeId },
    CancelTrade { trade_id: TradeId },
    DeclareBankruptcy,
    CastVote { target: PlayerId },
}

impl Action {
    /// Whether a player with an open debt may still take this action.
    ///
    /// Debtors may only raise cash, trade, or give up.
    #[must_use]
    pub fn allowed_in_debt(&self) -> bool {
        matches!(
            self,
            Action::BreakHouse { .. }
                | Action::SellProperty { .. }
                | Action::Mortgage { .. }
                | Action::Unmortgage { .. }
                | Action::ProposeTrade { .. }
                | Action::AcceptTrade { .. }
                | Action::RejectTrade { .. }
                | Action::CancelTrade { .. }
                | Action::DeclareBankruptcy
                | Action::CastVote { .. }
                | Action::PassAuction
        )
    }
}

/// Anything that drives a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Input {
    /// A player action.
    Player { player: PlayerId, action: Action },
    /// The auction countdown expired.
    AuctionTimeout,
    /// The idle warning timer fired for `player`.
    InactivityWarning { player: PlayerId },
    /// The idle kick timer fired for `target`.
    OpenVoteout { target: PlayerId, at: Millis },
}

/// A recorded input with metadata for replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// The input applied.
    pub input: Input,

    /// Dice consumed while applying it, if any.
    pub dice: Option<DiceRoll>,

    /// Turn number when it was applied.
    pub turn: u32,

    /// Position in the game's input history.
    pub sequence: u32,
}

impl InputRecord {
    /// Create a new input record.
    #[must_use]
    pub fn new(input: Input, dice: Option<DiceRoll>, turn: u32, sequence: u32) -> Self {
        Self {
            input,
            dice,
            turn,
            sequence,
        }
    }
}
