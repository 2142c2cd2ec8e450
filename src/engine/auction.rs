//! Auctions for declined properties.
//!
//! Bidding is open outcry: any active bidder may raise at any time and
//! the rotating pointer is informational only. An auction ends when
//!
//! - the countdown expires ([`resolve_timeout`]),
//! - the highest bidder is the only participant left, or
//! - every participant has dropped out.
//!
//! An auction that ends without a sale also ends the mover's turn, as does
//! any close once the mover has gone bankrupt.

use smallvec::SmallVec;
use tracing::info;

use super::{property, turn};
use crate::board::TileId;
use crate::core::error::ensure;
use crate::core::{
    AuctionState, EngineError, GameState, PendingAction, PlayerId, Rejection, RuleResult,
};
use crate::events::GameEvent;

/// How an auction step left things.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Open,
    Won,
    Unsold,
}

/// Open an auction on `tile` among every player still in the game.
pub fn start(state: &mut GameState, tile: TileId) {
    let bidders: SmallVec<[PlayerId; 4]> = state.active_players().collect();

    state.pending_action = Some(PendingAction::Auction(AuctionState {
        tile,
        highest_bid: 0,
        highest_bidder: None,
        active_bidders: bidders.clone(),
        current_bidder_index: 0,
    }));
    state.push_event(GameEvent::AuctionStarted { tile, bidders });
}

fn auction_mut(state: &mut GameState) -> Option<&mut AuctionState> {
    match &mut state.pending_action {
        Some(PendingAction::Auction(auction)) => Some(auction),
        _ => None,
    }
}

/// Raise the highest bid.
pub fn place_bid(state: &mut GameState, player: PlayerId, amount: i64) -> RuleResult {
    let money = state.money(player);
    let auction = auction_mut(state).ok_or(Rejection::NoAuction)?;
    let position = auction
        .active_bidders
        .iter()
        .position(|&b| b == player)
        .ok_or(Rejection::NotBidding(player))?;
    ensure(
        amount > auction.highest_bid,
        Rejection::BidTooLow { bid: amount, highest: auction.highest_bid },
    )?;
    ensure(money >= amount, Rejection::InsufficientFunds { needed: amount, available: money })?;

    auction.highest_bid = amount;
    auction.highest_bidder = Some(player);
    auction.current_bidder_index = (position + 1) % auction.active_bidders.len();
    let tile = auction.tile;

    state.push_event(GameEvent::BidPlaced { player, tile, amount });
    let outcome = after_change(state)?;
    finish(state, outcome)
}

/// Leave the auction. The highest bidder must stay in.
pub fn pass(state: &mut GameState, player: PlayerId) -> RuleResult {
    let auction = auction_mut(state).ok_or(Rejection::NoAuction)?;
    ensure(auction.active_bidders.contains(&player), Rejection::NotBidding(player))?;
    ensure(auction.highest_bidder != Some(player), Rejection::HighestBidderCannotPass)?;

    let tile = remove_bidder(auction, player);
    state.push_event(GameEvent::AuctionPassed { player, tile });
    let outcome = after_change(state)?;
    finish(state, outcome)
}

/// The countdown expired: sell to the highest bidder or end unsold.
pub fn resolve_timeout(state: &mut GameState) -> RuleResult {
    let auction = state.auction().ok_or(Rejection::NoAuction)?;
    let outcome = if auction.highest_bidder.is_some() {
        award(state)?
    } else {
        let tile = auction.tile;
        close_unsold(state, tile);
        Outcome::Unsold
    };
    finish(state, outcome)
}

/// Remove a player who left the game.
///
/// Returns `true` when this closed the auction unsold; the caller owns
/// ending the turn in that case.
pub fn drop_bidder(state: &mut GameState, player: PlayerId) -> RuleResult<bool> {
    let Some(auction) = auction_mut(state) else {
        return Ok(false);
    };
    if !auction.active_bidders.contains(&player) {
        return Ok(false);
    }

    remove_bidder(auction, player);
    if auction.highest_bidder == Some(player) {
        auction.highest_bidder = None;
        auction.highest_bid = 0;
    }
    Ok(after_change(state)? == Outcome::Unsold)
}

fn remove_bidder(auction: &mut AuctionState, player: PlayerId) -> TileId {
    if let Some(index) = auction.active_bidders.iter().position(|&b| b == player) {
        auction.active_bidders.remove(index);
        if index < auction.current_bidder_index {
            auction.current_bidder_index -= 1;
        }
        if auction.current_bidder_index >= auction.active_bidders.len() {
            auction.current_bidder_index = 0;
        }
    }
    auction.tile
}

fn after_change(state: &mut GameState) -> Result<Outcome, EngineError> {
    let Some(auction) = state.auction() else {
        return Ok(Outcome::Open);
    };

    let tile = auction.tile;
    let remaining = auction.active_bidders.len();
    let sole_highest =
        remaining == 1 && auction.highest_bidder == auction.active_bidders.first().copied();

    if remaining == 0 {
        close_unsold(state, tile);
        Ok(Outcome::Unsold)
    } else if sole_highest {
        award(state)
    } else {
        Ok(Outcome::Open)
    }
}

/// Sell to the highest bidder.
///
/// Ends unsold if the winner can no longer pay. Fatal if nobody bid.
fn award(state: &mut GameState) -> Result<Outcome, EngineError> {
    let Some(auction) = state.auction() else {
        return Ok(Outcome::Open);
    };
    let (tile, amount) = (auction.tile, auction.highest_bid);
    let winner = auction.highest_bidder.ok_or(EngineError::NoHighestBidder(tile))?;

    let solvent = state.player(winner).is_some_and(|p| !p.is_bankrupt && p.money >= amount);
    if !solvent {
        close_unsold(state, tile);
        return Ok(Outcome::Unsold);
    }

    property::acquire(state, winner, tile, amount);
    state.pending_action = None;
    state.push_event(GameEvent::AuctionWon { player: winner, tile, amount });
    info!(%winner, %tile, amount, "auction won");
    Ok(Outcome::Won)
}

fn close_unsold(state: &mut GameState, tile: TileId) {
    state.pending_action = None;
    state.push_event(GameEvent::AuctionEndedUnsold { tile });
    info!(%tile, "auction ended unsold");
}

/// End the mover's turn when the auction closed unsold, or when it closed
/// after the mover went bankrupt.
fn finish(state: &mut GameState, outcome: Outcome) -> RuleResult {
    if state.is_over() {
        return Ok(());
    }
    let closed = outcome != Outcome::Open;
    if outcome == Outcome::Unsold || (closed && turn::mover_bankrupt(state)) {
        turn::end_turn(state)?;
    }
    Ok(())
}
