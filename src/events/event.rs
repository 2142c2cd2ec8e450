//! Game event types.
//!
//! Every field change in `GameState` is justified by at least one event
//! appended to the state's log. The log is append-only and is what a
//! transport layer ships to observers.
//!
//! Events serialize as externally tagged objects keyed by the event name,
//! which keeps them readable as JSON and decodable from binary snapshots:
//!
//! ```
//! use monopoly_engine::core::PlayerId;
//! use monopoly_engine::events::GameEvent;
//!
//! let event = GameEvent::GameOver { winner: PlayerId::new(2) };
//! let json = serde_json::to_string(&event).unwrap();
//! assert_eq!(json, r#"{"GAME_OVER":{"winner":2}}"#);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::TileId;
use crate::cards::{CardEffect, DeckKind};
use crate::core::{DebtCause, DiceRoll, PlayerId};
use crate::engine::trade::TradeId;

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    // === Setup and turns ===
    GameStarted {
        players: SmallVec<[PlayerId; 4]>,
    },
    DiceRolled {
        player: PlayerId,
        dice: DiceRoll,
    },
    PlayerMoved {
        player: PlayerId,
        from: TileId,
        to: TileId,
    },
    PassedGo {
        player: PlayerId,
        amount: i64,
    },
    PlayerSentToJail {
        player: PlayerId,
    },
    LeftJail {
        player: PlayerId,
        paid_fine: bool,
    },
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    // === Tiles ===
    PurchaseOffered {
        player: PlayerId,
        tile: TileId,
        price: i64,
    },
    RentPaid {
        payer: PlayerId,
        owner: PlayerId,
        amount: i64,
    },
    TaxPaid {
        player: PlayerId,
        amount: i64,
    },
    FreeParkingCollected {
        player: PlayerId,
        amount: i64,
    },
    CardDrawn {
        player: PlayerId,
        deck: DeckKind,
        index: usize,
        effect: CardEffect,
    },

    // === Property transactions ===
    PropertyBought {
        player: PlayerId,
        tile: TileId,
        price: i64,
    },
    PropertySold {
        player: PlayerId,
        tile: TileId,
        refund: i64,
    },
    PropertyMortgaged {
        player: PlayerId,
        tile: TileId,
        amount: i64,
    },
    PropertyUnmortgaged {
        player: PlayerId,
        tile: TileId,
        cost: i64,
    },
    HouseBuilt {
        player: PlayerId,
        tile: TileId,
        houses: u8,
        cost: i64,
    },
    HouseBroken {
        player: PlayerId,
        tile: TileId,
        houses: u8,
        refund: i64,
    },

    // === Auctions ===
    AuctionStarted {
        tile: TileId,
        bidders: SmallVec<[PlayerId; 4]>,
    },
    BidPlaced {
        player: PlayerId,
        tile: TileId,
        amount: i64,
    },
    AuctionPassed {
        player: PlayerId,
        tile: TileId,
    },
    AuctionWon {
        player: PlayerId,
        tile: TileId,
        amount: i64,
    },
    AuctionEndedUnsold {
        tile: TileId,
    },

    // === Debt and bankruptcy ===
    DebtIncurred {
        player: PlayerId,
        amount: i64,
        creditor: Option<PlayerId>,
        cause: DebtCause,
    },
    DebtResolved {
        player: PlayerId,
        amount: i64,
        creditor: Option<PlayerId>,
    },
    PlayerBankrupt {
        player: PlayerId,
        caused_by: Option<PlayerId>,
    },
    GameOver {
        winner: PlayerId,
    },

    // === Trades ===
    TradeProposed {
        trade_id: TradeId,
        from: PlayerId,
        to: PlayerId,
    },
    TradeAccepted {
        trade_id: TradeId,
    },
    TradeRejected {
        trade_id: TradeId,
    },
    TradeCancelled {
        trade_id: TradeId,
    },

    // === Inactivity ===
    InactivityWarning {
        player: PlayerId,
    },
    VoteoutStarted {
        target: PlayerId,
    },
    VoteCast {
        voter: PlayerId,
        target: PlayerId,
    },
    VoteoutCancelled {
        target: PlayerId,
    },
    PlayerVotedOut {
        target: PlayerId,
    },
}

impl GameEvent {
    /// The player this event is chiefly about, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        use GameEvent::*;

        match self {
            DiceRolled { player, .. }
            | PlayerMoved { player, .. }
            | PassedGo { player, .. }
            | PlayerSentToJail { player }
            | LeftJail { player, .. }
            | TurnEnded { player, .. }
            | PurchaseOffered { player, .. }
            | TaxPaid { player, .. }
            | FreeParkingCollected { player, .. }
            | CardDrawn { player, .. }
            | PropertyBought { player, .. }
            | PropertySold { player, .. }
            | PropertyMortgaged { player, .. }
            | PropertyUnmortgaged { player, .. }
            | HouseBuilt { player, .. }
            | HouseBroken { player, .. }
            | BidPlaced { player, .. }
            | AuctionPassed { player, .. }
            | AuctionWon { player, .. }
            | DebtIncurred { player, .. }
            | DebtResolved { player, .. }
            | PlayerBankrupt { player, .. }
            | InactivityWarning { player } => Some(*player),
            RentPaid { payer, .. } => Some(*payer),
            GameOver { winner } => Some(*winner),
            TradeProposed { from, .. } => Some(*from),
            VoteCast { voter, .. } => Some(*voter),
            VoteoutStarted { target } | VoteoutCancelled { target } | PlayerVotedOut { target } => {
                Some(*target)
            }
            GameStarted { .. }
            | AuctionStarted { .. }
            | AuctionEndedUnsold { .. }
            | TradeAccepted { .. }
            | TradeRejected { .. }
            | TradeCancelled { .. } => None,
        }
    }
}
