//! Property transactions: buying, selling, mortgages and houses.
//!
//! ## Uniform building
//!
//! Houses within a colour group must stay within one of each other. A
//! build is only allowed on a tile holding the group minimum, a break
//! only on a tile holding the group maximum, so the spread never exceeds
//! one.
//!
//! Management actions are allowed off-turn. Every action that raises or
//! spends cash re-runs the debt check for the acting player.

use tracing::debug;

use super::{auction, debt, Context};
use crate::board::{PropertyInfo, TileId, HOTEL};
use crate::core::error::ensure;
use crate::core::{GameState, PendingAction, PlayerId, PropertyOwnership, Rejection, RuleResult};
use crate::events::GameEvent;

fn info_for<'b>(ctx: Context<'b>, tile: TileId) -> Result<&'b PropertyInfo, Rejection> {
    ctx.board.property(tile).ok_or(Rejection::NotPurchasable(tile))
}

fn owned_by(
    state: &GameState,
    player: PlayerId,
    tile: TileId,
) -> Result<PropertyOwnership, Rejection> {
    state
        .ownership(tile)
        .filter(|o| o.owner == player)
        .copied()
        .ok_or(Rejection::NotOwner { player, tile })
}

fn funds(state: &GameState, player: PlayerId, needed: i64) -> RuleResult {
    let available = state.money(player);
    ensure(available >= needed, Rejection::InsufficientFunds { needed, available })
}

/// Give `tile` to `player` for `price`. Callers validate and emit events.
pub(crate) fn acquire(state: &mut GameState, player: PlayerId, tile: TileId, price: i64) {
    state.adjust_money(player, -price);
    state.properties.insert(tile, PropertyOwnership::new(tile, player));
}

/// Buy an unowned property outright.
pub fn buy_property(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
) -> RuleResult {
    let price = info_for(ctx, tile)?.price;
    ensure(state.owner_of(tile).is_none(), Rejection::AlreadyOwned(tile))?;
    funds(state, player, price)?;

    acquire(state, player, tile, price);
    state.push_event(GameEvent::PropertyBought { player, tile, price });
    debug!(%player, %tile, price, "property bought");
    Ok(())
}

fn pending_buy(state: &GameState, player: PlayerId) -> Result<TileId, Rejection> {
    match state.pending_action {
        Some(PendingAction::BuyProperty { tile, player: p }) if p == player => Ok(tile),
        _ => Err(Rejection::NoPendingPurchase(player)),
    }
}

/// Accept the open buy prompt.
pub fn confirm_purchase(ctx: Context<'_>, state: &mut GameState, player: PlayerId) -> RuleResult {
    let tile = pending_buy(state, player)?;
    buy_property(ctx, state, player, tile)?;
    state.pending_action = None;
    Ok(())
}

/// Decline the open buy prompt; the property goes to auction.
pub fn decline_purchase(state: &mut GameState, player: PlayerId) -> RuleResult {
    let tile = pending_buy(state, player)?;
    auction::start(state, tile);
    Ok(())
}

/// Sell an unimproved, unmortgaged property back to the bank.
pub fn sell_property(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
) -> RuleResult {
    let info = info_for(ctx, tile)?;
    let record = owned_by(state, player, tile)?;
    ensure(record.houses == 0, Rejection::HasBuildings(tile))?;
    ensure(!record.is_mortgaged, Rejection::Mortgaged(tile))?;

    let refund = info.sale_value();
    state.properties.remove(&tile);
    state.adjust_money(player, refund);
    state.push_event(GameEvent::PropertySold { player, tile, refund });
    debt::recheck(state, player)
}

/// Mortgage an unimproved property for half its price.
pub fn mortgage(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
) -> RuleResult {
    let info = info_for(ctx, tile)?;
    let record = owned_by(state, player, tile)?;
    ensure(!record.is_mortgaged, Rejection::Mortgaged(tile))?;
    ensure(record.houses == 0, Rejection::HasBuildings(tile))?;

    let amount = info.mortgage_value();
    if let Some(r) = state.properties.get_mut(&tile) {
        r.is_mortgaged = true;
    }
    state.adjust_money(player, amount);
    state.push_event(GameEvent::PropertyMortgaged { player, tile, amount });
    debt::recheck(state, player)
}

/// Lift a mortgage for the mortgage value plus ten percent.
pub fn unmortgage(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
) -> RuleResult {
    let info = info_for(ctx, tile)?;
    let record = owned_by(state, player, tile)?;
    ensure(record.is_mortgaged, Rejection::NotMortgaged(tile))?;

    let cost = info.unmortgage_cost();
    funds(state, player, cost)?;

    if let Some(r) = state.properties.get_mut(&tile) {
        r.is_mortgaged = false;
    }
    state.adjust_money(player, -cost);
    state.push_event(GameEvent::PropertyUnmortgaged { player, tile, cost });
    debt::recheck(state, player)
}

/// House counts across the group of `tile`, after checking that
/// `player` owns every member.
fn group_houses(
    ctx: Context<'_>,
    state: &GameState,
    player: PlayerId,
    tile: TileId,
    info: &PropertyInfo,
) -> Result<Vec<PropertyOwnership>, Rejection> {
    ctx.board
        .group_members(info.group)
        .iter()
        .map(|&member| {
            state
                .ownership(member)
                .filter(|o| o.owner == player)
                .copied()
                .ok_or(Rejection::IncompleteGroup(tile))
        })
        .collect()
}

/// Build one house (or the hotel) on a street.
pub fn build_house(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
) -> RuleResult {
    let info = info_for(ctx, tile)?;
    let cost = info.house_cost().ok_or(Rejection::NotBuildable(tile))?;
    let record = owned_by(state, player, tile)?;

    let group = group_houses(ctx, state, player, tile, info)?;
    ensure(group.iter().all(|o| !o.is_mortgaged), Rejection::GroupMortgaged(tile))?;
    ensure(record.houses < HOTEL, Rejection::MaxHouses(tile))?;
    let min = group.iter().map(|o| o.houses).min().unwrap_or(0);
    ensure(record.houses == min, Rejection::NonUniformBuilding(tile))?;
    funds(state, player, cost)?;

    let houses = record.houses + 1;
    if let Some(r) = state.properties.get_mut(&tile) {
        r.houses = houses;
    }
    state.adjust_money(player, -cost);
    state.push_event(GameEvent::HouseBuilt { player, tile, houses, cost });
    debug!(%player, %tile, houses, "house built");
    Ok(())
}

/// Sell one house back to the bank for half its cost.
pub fn break_house(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
) -> RuleResult {
    let info = info_for(ctx, tile)?;
    let cost = info.house_cost().ok_or(Rejection::NotBuildable(tile))?;
    let record = owned_by(state, player, tile)?;
    ensure(record.houses > 0, Rejection::NoHouses(tile))?;

    let group = group_houses(ctx, state, player, tile, info)?;
    let max = group.iter().map(|o| o.houses).max().unwrap_or(0);
    ensure(record.houses == max, Rejection::NonUniformBuilding(tile))?;

    let houses = record.houses - 1;
    let refund = cost / 2;
    if let Some(r) = state.properties.get_mut(&tile) {
        r.houses = houses;
    }
    state.adjust_money(player, refund);
    state.push_event(GameEvent::HouseBroken { player, tile, houses, refund });
    debt::recheck(state, player)
}
