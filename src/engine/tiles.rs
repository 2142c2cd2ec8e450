//! Landing resolution.
//!
//! Called after every move that should trigger the destination tile:
//! dice moves and card advances, but not the jump to jail.

use tracing::debug;

use super::{auction, debt, property, turn, Context};
use crate::board::{PropertyKind, TileId, TileKind, BOARD_SIZE, RAILROAD_RENTS, UTILITY_MULTIPLIERS};
use crate::cards::{CardEffect, DeckKind};
use crate::core::{DebtCause, GameState, PendingAction, PlayerId, PurchaseMode, RuleResult};
use crate::events::GameEvent;

/// Apply the effect of the tile `player` is standing on.
pub fn resolve_landing(ctx: Context<'_>, state: &mut GameState, player: PlayerId) -> RuleResult {
    let Some(position) = state.player(player).map(|p| p.position) else {
        return Ok(());
    };
    let tile = ctx.board.tile(position);

    match tile.kind {
        TileKind::Go | TileKind::Jail => Ok(()),
        TileKind::FreeParking => {
            collect_pot(state, player);
            Ok(())
        }
        TileKind::GoToJail => {
            turn::send_to_jail(state, player);
            Ok(())
        }
        TileKind::Tax { amount } => debt::charge(state, player, amount, None, DebtCause::Tax),
        TileKind::Property(info) => match state.ownership(position).copied() {
            None => offer_purchase(ctx, state, player, position, info.price),
            Some(record) if record.owner == player || record.is_mortgaged => Ok(()),
            Some(record) => {
                let rent = rent_for(ctx, state, position);
                debug!(payer = %player, owner = %record.owner, tile = %position, rent, "rent due");
                debt::charge(state, player, rent, Some(record.owner), DebtCause::Rent)
            }
        },
        TileKind::CommunityChest => draw_card(ctx, state, player, DeckKind::CommunityChest),
        TileKind::Chance => draw_card(ctx, state, player, DeckKind::Chance),
    }
}

fn collect_pot(state: &mut GameState, player: PlayerId) {
    let amount = state.free_parking_pot;
    if amount > 0 {
        state.free_parking_pot = 0;
        state.adjust_money(player, amount);
        state.push_event(GameEvent::FreeParkingCollected { player, amount });
    }
}

fn offer_purchase(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
    price: i64,
) -> RuleResult {
    match ctx.config.purchase_mode {
        PurchaseMode::Prompt => {
            state.pending_action = Some(PendingAction::BuyProperty { tile, player });
            state.push_event(GameEvent::PurchaseOffered { player, tile, price });
            Ok(())
        }
        PurchaseMode::Auto if state.money(player) >= price => {
            property::buy_property(ctx, state, player, tile)
        }
        PurchaseMode::Auto => {
            auction::start(state, tile);
            Ok(())
        }
    }
}

/// Rent owed for landing on an owned, unmortgaged `tile`.
///
/// - Streets: `rent[houses]`, doubled when unimproved in a complete,
///   unmortgaged group
/// - Railroads: by number of railroads the owner holds
/// - Utilities: a multiple of the last dice total
#[must_use]
pub fn rent_for(ctx: Context<'_>, state: &GameState, tile: TileId) -> i64 {
    let (Some(info), Some(record)) = (ctx.board.property(tile), state.ownership(tile)) else {
        return 0;
    };
    if record.is_mortgaged {
        return 0;
    }

    let members = ctx.board.group_members(info.group);
    let owned_in_group = members
        .iter()
        .filter_map(|&m| state.ownership(m))
        .filter(|o| o.owner == record.owner)
        .count();

    match info.kind {
        PropertyKind::Street { rent, .. } => {
            let houses = usize::from(record.houses);
            if houses > 0 {
                return rent[houses];
            }
            let monopoly = owned_in_group == members.len()
                && members.iter().all(|&m| state.ownership(m).is_some_and(|o| !o.is_mortgaged));
            if monopoly {
                rent[0] * 2
            } else {
                rent[0]
            }
        }
        PropertyKind::Railroad => RAILROAD_RENTS[owned_in_group.clamp(1, RAILROAD_RENTS.len()) - 1],
        PropertyKind::Utility => {
            let index = owned_in_group.clamp(1, UTILITY_MULTIPLIERS.len()) - 1;
            let multiplier = UTILITY_MULTIPLIERS[index];
            let pips = state.last_roll.map_or(0, |r| i64::from(r.sum()));
            multiplier * pips
        }
    }
}

fn draw_card(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    deck: DeckKind,
) -> RuleResult {
    let drawn = match deck {
        DeckKind::CommunityChest => state.community_chest.draw(),
        DeckKind::Chance => state.chance.draw(),
    };
    let Some((index, card)) = drawn else {
        return Ok(());
    };

    state.push_event(GameEvent::CardDrawn { player, deck, index, effect: card.effect });
    debug!(%player, ?deck, text = %card.text, "card drawn");

    match card.effect {
        CardEffect::Collect(amount) => {
            state.adjust_money(player, amount);
            Ok(())
        }
        CardEffect::Pay(amount) => debt::charge(state, player, amount, None, DebtCause::Card),
        CardEffect::AdvanceTo(target) => {
            let from = state.player(player).map_or(TileId::GO, |p| p.position);
            let steps = (target.0 + BOARD_SIZE - from.0) % BOARD_SIZE;
            turn::move_player(ctx, state, player, steps);
            resolve_landing(ctx, state, player)
        }
        CardEffect::GoToJail => {
            turn::send_to_jail(state, player);
            Ok(())
        }
    }
}
