//! The Monopoly rules engine.
//!
//! Dispatches every [`Input`] to the sub-engine that owns it, working on a
//! clone of the committed state. On success the clone becomes the next
//! state and the input is appended to its history; on rejection the clone
//! is dropped.
//!
//! ## Gating
//!
//! Checked before any sub-engine runs:
//! - Nothing is accepted once the game has a winner
//! - The acting player must exist and be solvent
//! - A player with an open debt may only raise cash, trade, vote or quit

use std::sync::Arc;

use tracing::{debug, error};

use super::engine::{GameResult, RulesEngine, Step};
use crate::board::Board;
use crate::core::{
    Action, DiceRoll, DiceSource, EngineError, GameState, Input, InputRecord, PlayerId, Rejection,
    RuleError, RuleResult, RulesConfig, ScriptedDice,
};
use crate::engine::{auction, debt, property, trade, turn, voteout, Context};

/// Wraps a dice source and remembers what it rolled.
struct RecordingDice<'a> {
    inner: &'a mut dyn DiceSource,
    rolled: Option<DiceRoll>,
}

impl DiceSource for RecordingDice<'_> {
    fn roll(&mut self) -> DiceRoll {
        let roll = self.inner.roll();
        self.rolled = Some(roll);
        roll
    }
}

/// Classic rules on a shared board.
#[derive(Clone, Debug)]
pub struct Monopoly {
    board: Arc<Board>,
    config: RulesConfig,
}

impl Monopoly {
    /// Standard board with the given rule constants.
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self::with_board(Arc::new(Board::standard()), config)
    }

    /// Play on a custom board.
    #[must_use]
    pub fn with_board(board: Arc<Board>, config: RulesConfig) -> Self {
        Self { board, config }
    }

    /// Shared handle to the board.
    #[must_use]
    pub fn shared_board(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// Start a game under these rules.
    pub fn new_game<S: AsRef<str>>(&self, names: &[S]) -> Result<GameState, EngineError> {
        GameState::new(names, &self.config)
    }

    fn ctx(&self) -> Context<'_> {
        Context::new(&self.board, &self.config)
    }

    fn dispatch(
        &self,
        state: &mut GameState,
        input: &Input,
        dice: &mut dyn DiceSource,
    ) -> RuleResult {
        if state.is_over() {
            return Err(Rejection::GameOver.into());
        }

        match input {
            Input::Player { player, action } => {
                self.dispatch_action(state, *player, action, dice)?;
                voteout::cancel_for(state, *player);
                Ok(())
            }
            Input::AuctionTimeout => auction::resolve_timeout(state),
            Input::InactivityWarning { player } => voteout::issue_warning(state, *player),
            Input::OpenVoteout { target, at } => voteout::open_voteout(state, *target, *at),
        }
    }

    fn dispatch_action(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: &Action,
        dice: &mut dyn DiceSource,
    ) -> RuleResult {
        let acting = state.require_active(player)?;
        if acting.debt.is_some() && !action.allowed_in_debt() {
            return Err(Rejection::InDebt(player).into());
        }

        let ctx = self.ctx();
        match action {
            Action::RollDice => {
                turn::check_can_roll(state, player)?;
                let roll = turn::roll_dice(dice);
                turn::take_roll(ctx, state, player, roll)
            }
            Action::EndTurn => turn::request_end_turn(state, player),
            Action::PayJailFine => turn::pay_jail_fine(ctx, state, player),
            Action::BuyProperty => property::confirm_purchase(ctx, state, player),
            Action::SkipProperty => property::decline_purchase(state, player),
            Action::BuildHouse { tile } => property::build_house(ctx, state, player, *tile),
            Action::BreakHouse { tile } => property::break_house(ctx, state, player, *tile),
            Action::SellProperty { tile } => property::sell_property(ctx, state, player, *tile),
            Action::Mortgage { tile } => property::mortgage(ctx, state, player, *tile),
            Action::Unmortgage { tile } => property::unmortgage(ctx, state, player, *tile),
            Action::PlaceBid { amount } => auction::place_bid(state, player, *amount),
            Action::PassAuction => auction::pass(state, player),
            Action::ProposeTrade { to, terms } => {
                trade::initiate_trade(state, player, *to, terms.clone()).map(drop)
            }
            Action::AcceptTrade { trade_id } => trade::accept_trade(state, player, *trade_id),
            Action::RejectTrade { trade_id } => trade::reject_trade(state, player, *trade_id),
            Action::CancelTrade { trade_id } => trade::cancel_trade(state, player, *trade_id),
            Action::DeclareBankruptcy => debt::declare_bankruptcy(state, player),
            Action::CastVote { target } => voteout::cast_vote(state, player, *target),
        }
    }

    /// Actions worth trying for `player`; filtered by a dry run.
    fn candidates(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let mut actions = vec![
            Action::RollDice,
            Action::EndTurn,
            Action::PayJailFine,
            Action::BuyProperty,
            Action::SkipProperty,
            Action::PassAuction,
        ];

        if let Some(auction) = state.auction() {
            actions.push(Action::PlaceBid { amount: auction.highest_bid + 1 });
        }

        for record in state.properties_of(player) {
            let tile = record.tile;
            actions.extend([
                Action::BuildHouse { tile },
                Action::BreakHouse { tile },
                Action::SellProperty { tile },
                Action::Mortgage { tile },
                Action::Unmortgage { tile },
            ]);
        }

        for offer in state.pending_trades.iter() {
            let trade_id = offer.id;
            actions.extend([
                Action::AcceptTrade { trade_id },
                Action::RejectTrade { trade_id },
                Action::CancelTrade { trade_id },
            ]);
        }

        if let Some(vote) = &state.voteout {
            actions.push(Action::CastVote { target: vote.target });
        }

        actions.push(Action::DeclareBankruptcy);
        actions
    }
}

impl RulesEngine for Monopoly {
    fn config(&self) -> &RulesConfig {
        &self.config
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn apply_input(
        &self,
        state: &GameState,
        input: &Input,
        dice: &mut dyn DiceSource,
    ) -> Result<Step, EngineError> {
        let mut next = state.clone();
        let mut recorder = RecordingDice { inner: dice, rolled: None };

        match self.dispatch(&mut next, input, &mut recorder) {
            Ok(()) => {
                let sequence = u32::try_from(state.history.len()).unwrap_or(u32::MAX);
                let record =
                    InputRecord::new(input.clone(), recorder.rolled, state.turn_number, sequence);
                next.history.push_back(record);
                let emitted = next.events.len() - state.events.len();
                debug!(?input, turn = state.turn_number, events = emitted, "input applied");
                Ok(Step::applied(next))
            }
            Err(RuleError::Rejected(rejection)) => {
                debug!(?input, %rejection, "input rejected");
                Ok(Step::rejected(state.clone(), rejection))
            }
            Err(RuleError::Fatal(err)) => {
                error!(?input, %err, "engine error");
                Err(err)
            }
        }
    }

    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        if state.is_over() || state.player(player).map_or(true, |p| p.is_bankrupt) {
            return Vec::new();
        }

        self.candidates(state, player)
            .into_iter()
            .filter(|action| {
                let mut trial = state.clone();
                let mut dice = ScriptedDice::once(DiceRoll::new(1, 2));
                let input = Input::Player { player, action: action.clone() };
                self.dispatch(&mut trial, &input, &mut dice).is_ok()
            })
            .collect()
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.winner.map(|winner| GameResult { winner, turns: state.turn_number })
    }
}
