//! Dice, movement, jail and turn order.
//!
//! A turn is `AwaitingRoll` until the player rolls, then `AwaitingEndTurn`.
//! A double that is not the jail-sending one puts the turn back into
//! `AwaitingRoll` for another throw.

use tracing::debug;

use super::{debt, tiles, Context};
use crate::board::TileId;
use crate::core::error::ensure;
use crate::core::{
    DebtCause, DiceRoll, DiceSource, EngineError, GameState, PlayerId, Rejection, RuleResult,
    TurnPhase,
};
use crate::events::GameEvent;

/// Roll a fresh pair of dice.
pub fn roll_dice(dice: &mut dyn DiceSource) -> DiceRoll {
    dice.roll()
}

/// Validate that `player` may start a roll right now.
pub fn check_can_roll(state: &GameState, player: PlayerId) -> RuleResult {
    ensure(state.current_player()? == player, Rejection::NotYourTurn(player))?;
    ensure(state.pending_action.is_none(), Rejection::PendingActionOpen)?;
    ensure(state.turn_phase == TurnPhase::AwaitingRoll, Rejection::AlreadyRolled)
}

/// Apply a validated roll for the current player.
///
/// Handles jail attempts, the doubles limit, movement and landing.
pub fn take_roll(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    dice: DiceRoll,
) -> RuleResult {
    check_can_roll(state, player)?;

    state.last_roll = Some(dice);
    state.push_event(GameEvent::DiceRolled { player, dice });

    let in_jail = state.player(player).is_some_and(|p| p.in_jail);
    if in_jail {
        return roll_in_jail(ctx, state, player, dice);
    }

    if dice.is_double() {
        state.doubles_count += 1;
        if state.doubles_count >= ctx.config.doubles_to_jail {
            debug!(%player, "too many doubles");
            send_to_jail(state, player);
            return Ok(());
        }
        state.turn_phase = TurnPhase::AwaitingRoll;
    } else {
        state.doubles_count = 0;
        state.turn_phase = TurnPhase::AwaitingEndTurn;
    }

    move_player(ctx, state, player, dice.sum());
    tiles::resolve_landing(ctx, state, player)
}

fn roll_in_jail(
    ctx: Context<'_>,
    state: &mut GameState,
    player: PlayerId,
    dice: DiceRoll,
) -> RuleResult {
    state.doubles_count = 0;
    state.turn_phase = TurnPhase::AwaitingEndTurn;

    if dice.is_double() {
        release(state, player, false);
        move_player(ctx, state, player, dice.sum());
        return tiles::resolve_landing(ctx, state, player);
    }

    let attempts = match state.player_mut(player) {
        Some(p) => {
            p.jail_turns += 1;
            p.jail_turns
        }
        None => return Err(Rejection::UnknownPlayer(player).into()),
    };
    if attempts < ctx.config.max_jail_turns {
        return Ok(());
    }

    // Last attempt: the fine is forced.
    let fine = ctx.config.jail_fine;
    if state.money(player) >= fine {
        state.adjust_money(player, -fine);
        release(state, player, true);
        move_player(ctx, state, player, dice.sum());
        tiles::resolve_landing(ctx, state, player)
    } else {
        release(state, player, false);
        debt::charge(state, player, fine, None, DebtCause::JailFine)
    }
}

fn release(state: &mut GameState, player: PlayerId, paid_fine: bool) {
    if let Some(p) = state.player_mut(player) {
        p.in_jail = false;
        p.jail_turns = 0;
    }
    state.push_event(GameEvent::LeftJail { player, paid_fine });
}

/// Pay the jail fine before rolling.
pub fn pay_jail_fine(ctx: Context<'_>, state: &mut GameState, player: PlayerId) -> RuleResult {
    ensure(state.current_player()? == player, Rejection::NotYourTurn(player))?;
    ensure(state.turn_phase == TurnPhase::AwaitingRoll, Rejection::AlreadyRolled)?;
    let p = state.require_player(player)?;
    ensure(p.in_jail, Rejection::NotInJail(player))?;

    let fine = ctx.config.jail_fine;
    ensure(
        p.money >= fine,
        Rejection::InsufficientFunds { needed: fine, available: p.money },
    )?;

    state.adjust_money(player, -fine);
    release(state, player, true);
    Ok(())
}

/// Move `player` forward by `steps`, paying the GO bonus on wraparound.
///
/// Does not resolve the destination tile.
pub fn move_player(ctx: Context<'_>, state: &mut GameState, player: PlayerId, steps: u8) -> TileId {
    let Some(from) = state.player(player).map(|p| p.position) else {
        return TileId::GO;
    };
    let (to, passed_go) = from.advance(steps);

    if let Some(p) = state.player_mut(player) {
        p.position = to;
    }
    if passed_go {
        state.adjust_money(player, ctx.config.go_bonus);
        state.push_event(GameEvent::PassedGo { player, amount: ctx.config.go_bonus });
    }
    state.push_event(GameEvent::PlayerMoved { player, from, to });
    to
}

/// Put a player in jail. Ends any doubles streak and forfeits extra rolls.
pub fn send_to_jail(state: &mut GameState, player: PlayerId) {
    if let Some(p) = state.player_mut(player) {
        p.position = TileId::JAIL;
        p.in_jail = true;
        p.jail_turns = 0;
    }
    if state.current_player().ok() == Some(player) {
        state.doubles_count = 0;
        state.turn_phase = TurnPhase::AwaitingEndTurn;
    }
    state.push_event(GameEvent::PlayerSentToJail { player });
}

/// Whether the player whose turn it is has gone bankrupt.
#[must_use]
pub fn mover_bankrupt(state: &GameState) -> bool {
    let mover = state.current_player().ok();
    mover.and_then(|p| state.player(p)).is_some_and(|p| p.is_bankrupt)
}

/// Validate and apply an `EndTurn` request.
pub fn request_end_turn(state: &mut GameState, player: PlayerId) -> RuleResult {
    ensure(state.current_player()? == player, Rejection::NotYourTurn(player))?;
    ensure(state.pending_action.is_none(), Rejection::PendingActionOpen)?;
    ensure(state.turn_phase == TurnPhase::AwaitingEndTurn, Rejection::MustRoll)?;
    Ok(end_turn(state)?)
}

/// Advance to the next non-bankrupt player.
///
/// Bankrupt players keep their seat and are skipped. If nobody else is
/// left the turn stays with the current player.
pub fn end_turn(state: &mut GameState) -> Result<(), EngineError> {
    let current = state.current_player()?;
    let count = state.player_count();

    let next_index = (1..=count)
        .map(|offset| (state.current_turn_index + offset) % count)
        .find(|&i| state.players.get(i).is_some_and(|p| !p.is_bankrupt))
        .unwrap_or(state.current_turn_index);

    state.current_turn_index = next_index;
    state.turn_number += 1;
    state.doubles_count = 0;
    state.turn_phase = TurnPhase::AwaitingRoll;
    state.last_roll = None;

    let next_player = state.current_player()?;
    debug!(%current, next = %next_player, turn = state.turn_number, "turn ended");
    state.push_event(GameEvent::TurnEnded { player: current, next_player });
    Ok(())
}
