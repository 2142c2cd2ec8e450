//! Sub-engines that move a [`GameState`](crate::core::GameState) forward.
//!
//! Each sub-engine works on a mutable clone owned by the caller and
//! returns [`RuleResult`](crate::core::RuleResult). A rejection leaves the
//! clone half-edited, which is fine: the facade in [`crate::rules`] throws
//! it away and hands back the untouched input.
//!
//! ## Layout
//!
//! - `turn`: dice, movement, jail, turn order
//! - `tiles`: what happens on landing, rent, cards
//! - `property`: buy, sell, mortgage, houses
//! - `auction`: bidding on declined properties
//! - `debt`: shortfalls, settlement, bankruptcy, game over
//! - `trade`: player-to-player offers
//! - `voteout`: kicking idle players

pub mod auction;
pub mod debt;
pub mod property;
pub mod tiles;
pub mod trade;
pub mod turn;
pub mod voteout;

use crate::board::Board;
use crate::core::RulesConfig;

/// Immutable inputs every sub-engine reads.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub board: &'a Board,
    pub config: &'a RulesConfig,
}

impl<'a> Context<'a> {
    /// Bundle a board and rule constants.
    #[must_use]
    pub const fn new(board: &'a Board, config: &'a RulesConfig) -> Self {
        Self { board, config }
    }
}
