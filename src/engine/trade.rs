//! Player-to-player trades.
//!
//! A proposal is checked when made and checked again when accepted,
//! since either side may have spent money or built since. Buildings block
//! acceptance: a street must be stripped before it changes hands.
//! Mortgage flags travel with the property.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::debt;
use crate::board::TileId;
use crate::core::error::ensure;
use crate::core::{GameState, PlayerId, Rejection, RuleResult};
use crate::events::GameEvent;

/// Unique identifier for a trade offer within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradeId(pub u32);

impl std::fmt::Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trade #{}", self.0)
    }
}

/// What each side gives up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeTerms {
    /// Cash from the initiator to the target.
    pub offered_money: i64,
    /// Cash from the target to the initiator.
    pub requested_money: i64,
    /// Initiator's tiles going to the target.
    pub offered_tiles: SmallVec<[TileId; 4]>,
    /// Target's tiles going to the initiator.
    pub requested_tiles: SmallVec<[TileId; 4]>,
}

impl TradeTerms {
    /// Whether nothing changes hands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offered_money == 0
            && self.requested_money == 0
            && self.offered_tiles.is_empty()
            && self.requested_tiles.is_empty()
    }
}

/// An open proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub id: TradeId,
    pub from: PlayerId,
    pub to: PlayerId,
    pub terms: TradeTerms,
}

/// Both parties can still honour the terms.
fn validate(state: &GameState, from: PlayerId, to: PlayerId, terms: &TradeTerms) -> RuleResult {
    let initiator = state.require_active(from)?;
    let target = state.require_active(to)?;

    for amount in [terms.offered_money, terms.requested_money] {
        ensure(amount >= 0, Rejection::NegativeAmount(amount))?;
    }
    ensure(
        initiator.money >= terms.offered_money,
        Rejection::InsufficientFunds { needed: terms.offered_money, available: initiator.money },
    )?;
    ensure(
        target.money >= terms.requested_money,
        Rejection::InsufficientFunds { needed: terms.requested_money, available: target.money },
    )?;

    let sides = [(from, &terms.offered_tiles), (to, &terms.requested_tiles)];
    for (owner, tiles) in sides {
        for &tile in tiles.iter() {
            ensure(
                state.owner_of(tile) == Some(owner),
                Rejection::NotOwner { player: owner, tile },
            )?;
        }
    }
    Ok(())
}

fn find(state: &GameState, id: TradeId) -> Result<(usize, TradeOffer), Rejection> {
    state
        .pending_trades
        .iter()
        .position(|t| t.id == id)
        .and_then(|i| state.pending_trades.get(i).map(|t| (i, t.clone())))
        .ok_or(Rejection::UnknownTrade(id))
}

/// Propose a trade. Returns the new offer's id.
pub fn initiate_trade(
    state: &mut GameState,
    from: PlayerId,
    to: PlayerId,
    terms: TradeTerms,
) -> RuleResult<TradeId> {
    ensure(from != to, Rejection::SelfTrade)?;
    ensure(!terms.is_empty(), Rejection::EmptyTrade)?;
    validate(state, from, to, &terms)?;

    let id = TradeId(state.next_trade_id);
    state.next_trade_id += 1;
    state.pending_trades.push_back(TradeOffer { id, from, to, terms });
    state.push_event(GameEvent::TradeProposed { trade_id: id, from, to });
    debug!(%from, %to, %id, "trade proposed");
    Ok(id)
}

/// Accept a trade addressed to `player` and swap assets atomically.
pub fn accept_trade(state: &mut GameState, player: PlayerId, id: TradeId) -> RuleResult {
    let (index, offer) = find(state, id)?;
    ensure(offer.to == player, Rejection::NotTradeParty(player))?;
    validate(state, offer.from, offer.to, &offer.terms)?;

    let traded = offer.terms.offered_tiles.iter().chain(offer.terms.requested_tiles.iter());
    for &tile in traded {
        let houses = state.ownership(tile).map_or(0, |o| o.houses);
        ensure(houses == 0, Rejection::HasBuildings(tile))?;
    }

    let TradeOffer { from, to, terms, .. } = offer;
    state.transfer(from, to, terms.offered_money);
    state.transfer(to, from, terms.requested_money);
    for (tiles, new_owner) in [(&terms.offered_tiles, to), (&terms.requested_tiles, from)] {
        for tile in tiles.iter() {
            if let Some(record) = state.properties.get_mut(tile) {
                record.owner = new_owner;
            }
        }
    }

    state.pending_trades.remove(index);
    state.push_event(GameEvent::TradeAccepted { trade_id: id });
    debug!(%from, %to, %id, "trade accepted");

    debt::recheck(state, from)?;
    debt::recheck(state, to)
}

/// Turn down a trade addressed to `player`.
pub fn reject_trade(state: &mut GameState, player: PlayerId, id: TradeId) -> RuleResult {
    let (index, offer) = find(state, id)?;
    ensure(offer.to == player, Rejection::NotTradeParty(player))?;

    state.pending_trades.remove(index);
    state.push_event(GameEvent::TradeRejected { trade_id: id });
    Ok(())
}

/// Withdraw a trade `player` proposed.
pub fn cancel_trade(state: &mut GameState, player: PlayerId, id: TradeId) -> RuleResult {
    let (index, offer) = find(state, id)?;
    ensure(offer.from == player, Rejection::NotTradeParty(player))?;

    state.pending_trades.remove(index);
    state.push_event(GameEvent::TradeCancelled { trade_id: id });
    Ok(())
}
