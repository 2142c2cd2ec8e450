//! Game state: the root aggregate every transition produces.
//!
//! ## Snapshots
//!
//! All collections are `im` persistent structures, so cloning a
//! `GameState` is O(1) and mutating the clone copies only the touched
//! chunks. A transition therefore clones, edits the clone and returns it;
//! the previous value stays a valid snapshot for diffing or rollback.
//!
//! ## Contents
//!
//! - Players in seat order (bankrupt players stay in place)
//! - Ownership records keyed by tile (absent record = unowned)
//! - The append-only event log and input history
//! - At most one pending buy prompt or auction
//! - Open trades, card decks, the free-parking pot, any open kick vote

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::InputRecord;
use super::clock::Millis;
use super::config::RulesConfig;
use super::error::{EngineError, Rejection};
use super::player::{PlayerId, PlayerState};
use super::rng::DiceRoll;
use crate::board::TileId;
use crate::cards::Deck;
use crate::engine::trade::TradeOffer;
use crate::events::GameEvent;

/// Ownership record for one property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOwnership {
    pub tile: TileId,
    pub owner: PlayerId,
    /// 0-5, where 5 is a hotel. Never non-zero while mortgaged.
    pub houses: u8,
    pub is_mortgaged: bool,
}

impl PropertyOwnership {
    /// A freshly bought, unimproved property.
    #[must_use]
    pub const fn new(tile: TileId, owner: PlayerId) -> Self {
        Self {
            tile,
            owner,
            houses: 0,
            is_mortgaged: false,
        }
    }
}

/// Where the active player is within their turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The player must roll (start of turn, or after a double).
    #[default]
    AwaitingRoll,
    /// The player has moved and must end the turn.
    AwaitingEndTurn,
}

/// An auction in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub tile: TileId,
    /// Highest bid so far; 0 before any bid.
    pub highest_bid: i64,
    pub highest_bidder: Option<PlayerId>,
    /// Players still bidding, in seat order.
    pub active_bidders: SmallVec<[PlayerId; 4]>,
    /// Index into `active_bidders` of the player expected to bid next.
    pub current_bidder_index: usize,
}

/// The single in-flight sub-transaction blocking normal turn flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingAction {
    /// `player` landed on unowned `tile` and must buy or decline.
    BuyProperty { tile: TileId, player: PlayerId },
    /// The declined property is being auctioned.
    Auction(AuctionState),
}

/// A kick vote in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voteout {
    pub target: PlayerId,
    pub voters: SmallVec<[PlayerId; 4]>,
    pub started_at: Millis,
}

/// Full game state.
///
/// Fields are public for reading and for building test scenarios; the
/// engine is the only thing that produces new committed states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    // === Players and turn ===
    pub players: Vector<PlayerState>,
    pub current_turn_index: usize,
    pub turn_phase: TurnPhase,
    /// Consecutive doubles rolled this turn.
    pub doubles_count: u8,
    /// Starts at 1, increments on every turn change.
    pub turn_number: u32,
    /// Most recent roll, used for utility rent.
    pub last_roll: Option<DiceRoll>,

    // === Board ===
    pub properties: OrdMap<TileId, PropertyOwnership>,
    pub community_chest: Deck,
    pub chance: Deck,
    pub free_parking_pot: i64,

    // === In-flight sub-transactions ===
    pub pending_action: Option<PendingAction>,
    pub pending_trades: Vector<TradeOffer>,
    pub next_trade_id: u32,
    pub voteout: Option<Voteout>,

    // === Outcome and logs ===
    pub winner: Option<PlayerId>,
    pub events: Vector<GameEvent>,
    pub history: Vector<InputRecord>,
}

impl GameState {
    /// Create a new game with players seated in the given order.
    ///
    /// Fails with `EngineError::NoPlayers` when `names` is empty.
    pub fn new<S: AsRef<str>>(names: &[S], config: &RulesConfig) -> Result<Self, EngineError> {
        if names.is_empty() {
            return Err(EngineError::NoPlayers);
        }

        let players: Vector<PlayerState> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                PlayerState::new(PlayerId(i as u8), name.as_ref(), config.starting_money)
            })
            .collect();

        let mut state = Self {
            players,
            current_turn_index: 0,
            turn_phase: TurnPhase::AwaitingRoll,
            doubles_count: 0,
            turn_number: 1,
            last_roll: None,
            properties: OrdMap::new(),
            community_chest: Deck::community_chest(),
            chance: Deck::chance(),
            free_parking_pot: 0,
            pending_action: None,
            pending_trades: Vector::new(),
            next_trade_id: 0,
            voteout: None,
            winner: None,
            events: Vector::new(),
            history: Vector::new(),
        };

        let seats = PlayerId::all(names.len()).collect();
        state.push_event(GameEvent::GameStarted { players: seats });
        Ok(state)
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // === Players ===

    /// Get a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(id.index())
    }

    /// Get a player for editing. Copies the touched chunk if shared.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id.index())
    }

    /// Get a player or reject the action as naming an unknown seat.
    pub fn require_player(&self, id: PlayerId) -> Result<&PlayerState, Rejection> {
        self.player(id).ok_or(Rejection::UnknownPlayer(id))
    }

    /// Get a player that must be able to act: exists and is not bankrupt.
    pub fn require_active(&self, id: PlayerId) -> Result<&PlayerState, Rejection> {
        let player = self.require_player(id)?;
        if player.is_bankrupt {
            return Err(Rejection::Bankrupt(id));
        }
        Ok(player)
    }

    /// Whose turn it is.
    pub fn current_player(&self) -> Result<PlayerId, EngineError> {
        if self.players.is_empty() {
            return Err(EngineError::NoPlayers);
        }
        self.players
            .get(self.current_turn_index)
            .map(|p| p.id)
            .ok_or(EngineError::InvalidTurnIndex(self.current_turn_index))
    }

    /// Cash held by a player, 0 for unknown seats.
    #[must_use]
    pub fn money(&self, id: PlayerId) -> i64 {
        self.player(id).map_or(0, |p| p.money)
    }

    /// Add `delta` to a player's cash.
    pub fn adjust_money(&mut self, id: PlayerId, delta: i64) {
        if let Some(player) = self.player_mut(id) {
            player.money += delta;
        }
    }

    /// Move cash between players.
    pub fn transfer(&mut self, from: PlayerId, to: PlayerId, amount: i64) {
        self.adjust_money(from, -amount);
        self.adjust_money(to, amount);
    }

    /// Iterate over players still in the game.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter(|p| !p.is_bankrupt).map(|p| p.id)
    }

    /// Number of players still in the game.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_bankrupt).count()
    }

    /// The first player holding an open debt, if any.
    #[must_use]
    pub fn debtor(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.debt.is_some() && !p.is_bankrupt).map(|p| p.id)
    }

    // === Properties ===

    /// Ownership record for a tile.
    #[must_use]
    pub fn ownership(&self, tile: TileId) -> Option<&PropertyOwnership> {
        self.properties.get(&tile)
    }

    /// Owner of a tile, `None` when unowned.
    #[must_use]
    pub fn owner_of(&self, tile: TileId) -> Option<PlayerId> {
        self.properties.get(&tile).map(|o| o.owner)
    }

    /// Records owned by a player, in tile order.
    pub fn properties_of(&self, player: PlayerId) -> impl Iterator<Item = &PropertyOwnership> + '_ {
        self.properties.values().filter(move |o| o.owner == player)
    }

    // === Pending action ===

    /// The open auction, if any.
    #[must_use]
    pub fn auction(&self) -> Option<&AuctionState> {
        match &self.pending_action {
            Some(PendingAction::Auction(auction)) => Some(auction),
            _ => None,
        }
    }

    // === Logs ===

    /// Append an event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Events appended after the first `since` entries.
    pub fn events_since(&self, since: usize) -> impl Iterator<Item = &GameEvent> + '_ {
        self.events.iter().skip(since)
    }

    /// Whether a winner has been decided.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    // === Snapshots ===

    /// Encode as a compact binary snapshot.
    pub fn encode(&self) -> Result<Vec<u8>, EngineError> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot produced by [`GameState::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}
