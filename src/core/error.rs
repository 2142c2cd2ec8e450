//! Error tiers.
//!
//! - [`Rejection`]: an expected user mistake. The transition returns the
//!   unchanged state and appends no event.
//! - [`EngineError`]: a broken invariant or configuration. Fatal.
//!
//! Sub-engines return [`RuleResult`] so both tiers compose with `?`; the
//! rules facade splits them again.

use crate::board::TileId;
use crate::engine::trade::TradeId;

use super::player::PlayerId;

/// A validation failure. The action is refused and nothing changes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,
    #[error("{0} does not exist")]
    UnknownPlayer(PlayerId),
    #[error("{0} is bankrupt")]
    Bankrupt(PlayerId),
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("{0} must resolve an open debt first")]
    InDebt(PlayerId),
    #[error("the dice have already been rolled")]
    AlreadyRolled,
    #[error("the dice must be rolled before ending the turn")]
    MustRoll,
    #[error("a pending purchase or auction must be resolved first")]
    PendingActionOpen,
    #[error("{0} has no pending purchase")]
    NoPendingPurchase(PlayerId),
    #[error("{0} is not in jail")]
    NotInJail(PlayerId),
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("{0} cannot be bought")]
    NotPurchasable(TileId),
    #[error("{0} is already owned")]
    AlreadyOwned(TileId),
    #[error("{player} does not own {tile}")]
    NotOwner { player: PlayerId, tile: TileId },
    #[error("{0} has buildings on it")]
    HasBuildings(TileId),
    #[error("{0} is mortgaged")]
    Mortgaged(TileId),
    #[error("{0} is not mortgaged")]
    NotMortgaged(TileId),
    #[error("houses cannot be built on {0}")]
    NotBuildable(TileId),
    #[error("the whole group of {0} must be owned to build")]
    IncompleteGroup(TileId),
    #[error("a property in the group of {0} is mortgaged")]
    GroupMortgaged(TileId),
    #[error("building on {0} would make the group non-uniform")]
    NonUniformBuilding(TileId),
    #[error("{0} already has a hotel")]
    MaxHouses(TileId),
    #[error("{0} has no houses")]
    NoHouses(TileId),
    #[error("no auction is in progress")]
    NoAuction,
    #[error("{0} is not bidding in this auction")]
    NotBidding(PlayerId),
    #[error("a bid of {bid} does not beat {highest}")]
    BidTooLow { bid: i64, highest: i64 },
    #[error("the highest bidder cannot pass")]
    HighestBidderCannotPass,
    #[error("trade {0} does not exist")]
    UnknownTrade(TradeId),
    #[error("a player cannot trade with themselves")]
    SelfTrade,
    #[error("a trade must exchange something")]
    EmptyTrade,
    #[error("amount {0} is negative")]
    NegativeAmount(i64),
    #[error("{0} is not allowed to respond to this trade")]
    NotTradeParty(PlayerId),
    #[error("a player cannot vote against themselves")]
    SelfVote,
    #[error("no vote is open against {0}: they are not holding up the game")]
    NoVoteoutForTarget(PlayerId),
    #[error("{0} has already voted")]
    DuplicateVote(PlayerId),
    #[error("the timer no longer matches the game")]
    StaleTimer,
}

/// A fatal error: corrupted state or a programming error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("the game has no players")]
    NoPlayers,
    #[error("turn index {0} is out of range")]
    InvalidTurnIndex(usize),
    #[error("the auction for {0} has no highest bidder to award")]
    NoHighestBidder(TileId),
    #[error("replay diverged at input {index}: {reason}")]
    ReplayDiverged { index: usize, reason: String },
    #[error("snapshot codec failed: {0}")]
    Snapshot(String),
}

/// Either error tier, for composing sub-engine steps with `?`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Fatal(#[from] EngineError),
}

/// Result of a sub-engine step.
pub type RuleResult<T = ()> = Result<T, RuleError>;

/// Reject with `rejection` unless `condition` holds.
pub(crate) fn ensure(condition: bool, rejection: Rejection) -> RuleResult {
    if condition {
        Ok(())
    } else {
        Err(rejection.into())
    }
}
