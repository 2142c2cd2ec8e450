//! Debt, settlement, bankruptcy and game over.
//!
//! ## Shortfalls
//!
//! A payment the player cannot cover is not deducted. It becomes an open
//! [`DebtResolution`] and the player is restricted to raising cash until
//! it settles. Every asset-changing action re-runs [`recheck`], which
//! settles the debt as soon as cash suffices and bankrupts the player once
//! nothing is left to mortgage.
//!
//! ## Where money goes
//!
//! | cause      | recipient          | event       |
//! |------------|--------------------|-------------|
//! | `Rent`     | creditor           | `RENT_PAID` |
//! | `Tax`      | free-parking pot   | `TAX_PAID`  |
//! | `Card`     | bank               |             |
//! | `JailFine` | bank               |             |

use tracing::info;

use super::{auction, turn, voteout};
use crate::core::{
    DebtCause, DebtResolution, GameState, PendingAction, PlayerId, Rejection, RuleResult,
};
use crate::events::GameEvent;

/// Charge `amount` to `player`, opening a debt on shortfall.
///
/// A player who cannot cover the charge and holds nothing to mortgage is
/// bankrupted immediately, with `creditor` as the cause.
pub fn charge(
    state: &mut GameState,
    player: PlayerId,
    amount: i64,
    creditor: Option<PlayerId>,
    cause: DebtCause,
) -> RuleResult {
    if amount <= 0 {
        return Ok(());
    }

    if state.money(player) >= amount {
        pay(state, player, amount, creditor, cause);
        return Ok(());
    }

    if let Some(p) = state.player_mut(player) {
        p.debt = Some(DebtResolution { amount, creditor, cause });
    }
    state.push_event(GameEvent::DebtIncurred { player, amount, creditor, cause });
    info!(%player, amount, ?cause, "debt incurred");

    if !can_recover(state, player) {
        bankrupt_player(state, player, creditor)?;
    }
    Ok(())
}

/// Move `amount` from `player` to wherever `cause` sends it.
fn pay(
    state: &mut GameState,
    player: PlayerId,
    amount: i64,
    creditor: Option<PlayerId>,
    cause: DebtCause,
) {
    state.adjust_money(player, -amount);

    match (cause, creditor) {
        (DebtCause::Tax, _) => {
            state.free_parking_pot += amount;
            state.push_event(GameEvent::TaxPaid { player, amount });
        }
        (DebtCause::Rent, Some(owner)) => {
            state.adjust_money(owner, amount);
            state.push_event(GameEvent::RentPaid { payer: player, owner, amount });
        }
        (_, Some(creditor)) => state.adjust_money(creditor, amount),
        (_, None) => {}
    }
}

/// Whether the player still holds something that can be mortgaged.
#[must_use]
pub fn can_recover(state: &GameState, player: PlayerId) -> bool {
    state.properties_of(player).any(|o| !o.is_mortgaged)
}

/// Re-evaluate an open debt after the player's assets changed.
///
/// Settles it when cash suffices, bankrupts the player when it cannot be
/// recovered, otherwise leaves it open.
pub fn recheck(state: &mut GameState, player: PlayerId) -> RuleResult {
    let Some(debt) = state.player(player).and_then(|p| p.debt) else {
        return Ok(());
    };

    if state.money(player) >= debt.amount {
        if let Some(p) = state.player_mut(player) {
            p.debt = None;
        }
        pay(state, player, debt.amount, debt.creditor, debt.cause);
        state.push_event(GameEvent::DebtResolved {
            player,
            amount: debt.amount,
            creditor: debt.creditor,
        });
        info!(%player, amount = debt.amount, "debt resolved");
    } else if !can_recover(state, player) {
        bankrupt_player(state, player, debt.creditor)?;
    }
    Ok(())
}

/// Voluntarily leave the game.
///
/// An open debt's creditor receives the assets, as in a forced bankruptcy.
pub fn declare_bankruptcy(state: &mut GameState, player: PlayerId) -> RuleResult {
    let creditor = state.require_active(player)?.debt.and_then(|d| d.creditor);
    bankrupt_player(state, player, creditor)
}

/// Remove a player from the game.
///
/// No-op for a player already bankrupt. With a creditor, cash and every
/// property (mortgage kept, buildings cleared) go to the creditor;
/// without one, properties return to the bank.
pub fn bankrupt_player(
    state: &mut GameState,
    player: PlayerId,
    caused_by: Option<PlayerId>,
) -> RuleResult {
    let Some(bankrupt) = state.player(player) else {
        return Err(Rejection::UnknownPlayer(player).into());
    };
    if bankrupt.is_bankrupt {
        return Ok(());
    }
    let cash = bankrupt.money.max(0);

    // Assets
    let owned: Vec<_> = state.properties_of(player).map(|o| o.tile).collect();
    match caused_by {
        Some(creditor) => {
            state.adjust_money(creditor, cash);
            for tile in owned {
                if let Some(record) = state.properties.get_mut(&tile) {
                    record.owner = creditor;
                    record.houses = 0;
                }
            }
        }
        None => {
            for tile in owned {
                state.properties.remove(&tile);
            }
        }
    }

    if let Some(p) = state.player_mut(player) {
        p.money = 0;
        p.debt = None;
        p.is_bankrupt = true;
    }

    // Open business
    state.pending_trades.retain(|t| t.from != player && t.to != player);
    let prompted = matches!(
        state.pending_action,
        Some(PendingAction::BuyProperty { player: p, .. }) if p == player
    );
    if prompted {
        state.pending_action = None;
    }
    let auction_closed = auction::drop_bidder(state, player)?;
    let vote_against_player = state.voteout.as_ref().is_some_and(|v| v.target == player);
    if vote_against_player {
        state.voteout = None;
    } else if let Some(vote) = &mut state.voteout {
        vote.voters.retain(|v| *v != player);
    }

    state.push_event(GameEvent::PlayerBankrupt { player, caused_by });
    info!(%player, ?caused_by, "player bankrupt");

    check_game_over(state);
    if state.is_over() {
        return Ok(());
    }

    // An open auction still belongs to the mover's turn; closing it ends the turn.
    if state.auction().is_none() && (auction_closed || turn::mover_bankrupt(state)) {
        turn::end_turn(state)?;
    }

    voteout::settle(state)
}

/// Declare the last solvent player the winner. Fires at most once.
pub fn check_game_over(state: &mut GameState) {
    if state.winner.is_some() || state.active_count() != 1 {
        return;
    }
    let last = state.active_players().next();
    if let Some(winner) = last {
        state.winner = Some(winner);
        state.push_event(GameEvent::GameOver { winner });
        info!(%winner, turns = state.turn_number, "game over");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileId;
    use crate::engine::fixtures::*;

    fn count_game_over(state: &GameState) -> usize {
        state.events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count()
    }

    #[test]
    fn test_charge_pays_when_affordable() {
        let mut state = game(2);
        charge(&mut state, P0, 100, Some(P1), DebtCause::Rent).unwrap();

        assert_eq!(state.money(P0), 1400);
        assert_eq!(state.money(P1), 1600);
        assert!(state.player(P0).unwrap().debt.is_none());
    }

    #[test]
    fn test_tax_goes_to_pot() {
        let mut state = game(2);
        charge(&mut state, P0, 200, None, DebtCause::Tax).unwrap();

        assert_eq!(state.free_parking_pot, 200);
        assert!(matches!(state.events.back(), Some(GameEvent::TaxPaid { amount: 200, .. })));
    }

    #[test]
    fn test_shortfall_opens_debt_without_deducting() {
        let mut state = game(2);
        give(&mut state, P0, &[1]);
        set_money(&mut state, P0, 50);

        charge(&mut state, P0, 100, Some(P1), DebtCause::Rent).unwrap();

        let p0 = state.player(P0).unwrap();
        assert_eq!(p0.money, 50);
        assert_eq!(
            p0.debt,
            Some(DebtResolution { amount: 100, creditor: Some(P1), cause: DebtCause::Rent })
        );
        assert!(!p0.is_bankrupt);
    }

    #[test]
    fn test_unrecoverable_shortfall_bankrupts() {
        let mut state = game(3);
        set_money(&mut state, P0, 50);

        charge(&mut state, P0, 100, Some(P1), DebtCause::Rent).unwrap();

        assert!(state.player(P0).unwrap().is_bankrupt);
        assert_eq!(state.money(P1), 1550);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::PlayerBankrupt { player: PlayerId(0), caused_by: Some(PlayerId(1)) }
        )));
    }

    #[test]
    fn test_recheck_settles_debt() {
        let mut state = game(2);
        set_money(&mut state, P0, 500);
        state.player_mut(P0).unwrap().debt =
            Some(DebtResolution { amount: 300, creditor: Some(P1), cause: DebtCause::Rent });

        recheck(&mut state, P0).unwrap();

        assert_eq!(state.money(P0), 200);
        assert_eq!(state.money(P1), 1800);
        assert!(state.player(P0).unwrap().debt.is_none());
        assert!(matches!(state.events.back(), Some(GameEvent::DebtResolved { amount: 300, .. })));
    }

    #[test]
    fn test_recheck_keeps_recoverable_debt() {
        let mut state = game(2);
        give(&mut state, P0, &[3]);
        set_money(&mut state, P0, 10);
        state.player_mut(P0).unwrap().debt =
            Some(DebtResolution { amount: 300, creditor: None, cause: DebtCause::Card });

        recheck(&mut state, P0).unwrap();

        assert!(state.player(P0).unwrap().debt.is_some());
        assert!(!state.player(P0).unwrap().is_bankrupt);
    }

    #[test]
    fn test_bankrupt_to_creditor_transfers_assets() {
        let mut state = game(3);
        give(&mut state, P0, &[1, 3]);
        state.properties.get_mut(&TileId::new(1)).unwrap().houses = 2;
        state.properties.get_mut(&TileId::new(3)).unwrap().is_mortgaged = true;
        set_money(&mut state, P0, 40);

        bankrupt_player(&mut state, P0, Some(P2)).unwrap();

        assert_eq!(state.money(P2), 1540);
        let first = state.ownership(TileId::new(1)).unwrap();
        assert_eq!((first.owner, first.houses), (P2, 0));
        let second = state.ownership(TileId::new(3)).unwrap();
        assert_eq!((second.owner, second.is_mortgaged), (P2, true));
        assert_eq!(state.money(P0), 0);
    }

    #[test]
    fn test_bankrupt_to_bank_vacates() {
        let mut state = game(3);
        give(&mut state, P1, &[1, 3]);

        bankrupt_player(&mut state, P1, None).unwrap();

        assert!(state.owner_of(TileId::new(1)).is_none());
        assert!(state.owner_of(TileId::new(3)).is_none());
    }

    #[test]
    fn test_bankruptcy_is_idempotent() {
        let mut state = game(3);
        bankrupt_player(&mut state, P1, None).unwrap();
        let once = state.clone();

        bankrupt_player(&mut state, P1, None).unwrap();

        assert_eq!(state, once);
    }

    #[test]
    fn test_bankrupt_current_player_ends_turn() {
        let mut state = game(3);
        bankrupt_player(&mut state, P0, None).unwrap();
        assert_eq!(state.current_player(), Ok(P1));
    }

    #[test]
    fn test_single_game_over() {
        let mut state = game(3);
        bankrupt_player(&mut state, P1, None).unwrap();
        assert_eq!(count_game_over(&state), 0);

        bankrupt_player(&mut state, P2, None).unwrap();
        assert_eq!(count_game_over(&state), 1);
        assert_eq!(state.winner, Some(P0));

        bankrupt_player(&mut state, P2, None).unwrap();
        assert_eq!(count_game_over(&state), 1);
    }

    #[test]
    fn test_bankruptcy_clears_pending_buy() {
        let mut state = game(3);
        state.pending_action =
            Some(PendingAction::BuyProperty { tile: TileId::new(6), player: P0 });

        bankrupt_player(&mut state, P0, None).unwrap();

        assert!(state.pending_action.is_none());
    }

    #[test]
    fn test_declare_bankruptcy_pays_creditor() {
        let mut state = game(3);
        give(&mut state, P0, &[5]);
        state.player_mut(P0).unwrap().debt =
            Some(DebtResolution { amount: 9999, creditor: Some(P2), cause: DebtCause::Rent });

        declare_bankruptcy(&mut state, P0).unwrap();

        assert_eq!(state.owner_of(TileId::new(5)), Some(P2));
        assert_eq!(state.money(P2), 3000);
    }

    fn turns_ended(state: &GameState) -> Vec<(PlayerId, PlayerId)> {
        state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TurnEnded { player, next_player } => Some((*player, *next_player)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_mover_bankrupt_mid_auction_keeps_turn_until_close() {
        let mut state = game(3);
        auction::start(&mut state, TileId::new(3));

        declare_bankruptcy(&mut state, P0).unwrap();

        assert!(state.auction().is_some());
        assert_eq!(state.current_player(), Ok(P0));
        assert!(turns_ended(&state).is_empty());

        auction::resolve_timeout(&mut state).unwrap();

        assert_eq!(state.current_player(), Ok(P1));
        assert_eq!(turns_ended(&state), vec![(P0, P1)]);
    }

    #[test]
    fn test_mover_bankrupt_then_auction_won_passes_turn() {
        let mut state = game(3);
        auction::start(&mut state, TileId::new(3));
        declare_bankruptcy(&mut state, P0).unwrap();

        auction::place_bid(&mut state, P2, 40).unwrap();
        auction::resolve_timeout(&mut state).unwrap();

        assert_eq!(state.owner_of(TileId::new(3)), Some(P2));
        assert_eq!(state.current_player(), Ok(P1));
        assert_eq!(turns_ended(&state), vec![(P0, P1)]);
    }

    #[test]
    fn test_bidder_bankruptcy_closing_auction_after_mover_left() {
        let mut state = game(4);
        auction::start(&mut state, TileId::new(3));
        declare_bankruptcy(&mut state, P0).unwrap();
        auction::place_bid(&mut state, P1, 10).unwrap();
        auction::pass(&mut state, P2).unwrap();

        declare_bankruptcy(&mut state, P3).unwrap();

        assert_eq!(state.owner_of(TileId::new(3)), Some(P1));
        assert!(state.auction().is_none());
        assert_eq!(turns_ended(&state), vec![(P0, P1)]);
    }
}
