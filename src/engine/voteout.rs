//! Kicking an idle player.
//!
//! Timers live in the session; these are the state transitions they
//! drive. A vote needs every other solvent player. A player voted out
//! goes bankrupt with no creditor, so their properties return to the bank.

use smallvec::SmallVec;
use tracing::info;

use super::debt;
use crate::core::error::ensure;
use crate::core::{GameState, Millis, PlayerId, Rejection, RuleResult, Voteout};
use crate::events::GameEvent;

/// Warn `player` that they are holding up the game.
pub fn issue_warning(state: &mut GameState, player: PlayerId) -> RuleResult {
    state.require_active(player)?;
    state.push_event(GameEvent::InactivityWarning { player });
    Ok(())
}

/// Open a kick vote against `target`.
///
/// Only one vote may be open at a time.
pub fn open_voteout(state: &mut GameState, target: PlayerId, at: Millis) -> RuleResult {
    state.require_active(target)?;
    ensure(state.voteout.is_none(), Rejection::StaleTimer)?;

    state.voteout = Some(Voteout { target, voters: SmallVec::new(), started_at: at });
    state.push_event(GameEvent::VoteoutStarted { target });
    info!(%target, "voteout started");
    Ok(())
}

/// Record a vote. The last required vote removes the target.
pub fn cast_vote(state: &mut GameState, voter: PlayerId, target: PlayerId) -> RuleResult {
    state.require_active(voter)?;
    ensure(voter != target, Rejection::SelfVote)?;

    let vote = state
        .voteout
        .as_mut()
        .filter(|v| v.target == target)
        .ok_or(Rejection::NoVoteoutForTarget(target))?;
    ensure(!vote.voters.contains(&voter), Rejection::DuplicateVote(voter))?;
    vote.voters.push(voter);

    state.push_event(GameEvent::VoteCast { voter, target });
    settle(state)
}

/// Remove the target once every other solvent player has voted.
///
/// Runs after every vote and every bankruptcy.
pub fn settle(state: &mut GameState) -> RuleResult {
    if state.is_over() {
        return Ok(());
    }
    let Some(vote) = &state.voteout else {
        return Ok(());
    };
    let target = vote.target;
    let unanimous = state
        .active_players()
        .filter(|&p| p != target)
        .all(|p| vote.voters.contains(&p));
    if !unanimous {
        return Ok(());
    }

    state.voteout = None;
    state.push_event(GameEvent::PlayerVotedOut { target });
    info!(%target, "player voted out");
    debt::bankrupt_player(state, target, None)
}

/// Close a vote because its target acted.
pub fn cancel_for(state: &mut GameState, player: PlayerId) {
    if state.voteout.as_ref().is_some_and(|v| v.target == player) {
        state.voteout = None;
        state.push_event(GameEvent::VoteoutCancelled { target: player });
        info!(target = %player, "voteout cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileId;
    use crate::core::RuleError;
    use crate::engine::fixtures::*;

    fn vote_open(players: usize, target: PlayerId) -> GameState {
        let mut state = game(players);
        open_voteout(&mut state, target, Millis(60_000)).unwrap();
        state
    }

    #[test]
    fn test_warning_event() {
        let mut state = game(2);
        issue_warning(&mut state, P0).unwrap();
        assert_eq!(state.events.back(), Some(&GameEvent::InactivityWarning { player: P0 }));
    }

    #[test]
    fn test_unanimous_vote_removes_target() {
        let mut state = vote_open(3, P0);
        give(&mut state, P0, &[1]);

        cast_vote(&mut state, P1, P0).unwrap();
        assert!(!state.player(P0).unwrap().is_bankrupt);

        cast_vote(&mut state, P2, P0).unwrap();

        assert!(state.player(P0).unwrap().is_bankrupt);
        assert!(state.owner_of(TileId::new(1)).is_none());
        assert!(state.voteout.is_none());
        assert_eq!(state.current_player(), Ok(P1));
    }

    #[test]
    fn test_vote_rejections() {
        let mut state = vote_open(3, P0);

        assert_eq!(
            cast_vote(&mut state, P0, P0).unwrap_err(),
            RuleError::Rejected(Rejection::SelfVote)
        );
        assert_eq!(
            cast_vote(&mut state, P1, P2).unwrap_err(),
            RuleError::Rejected(Rejection::NoVoteoutForTarget(P2))
        );

        cast_vote(&mut state, P1, P0).unwrap();
        assert_eq!(
            cast_vote(&mut state, P1, P0).unwrap_err(),
            RuleError::Rejected(Rejection::DuplicateVote(P1))
        );
    }

    #[test]
    fn test_bankrupt_voter_rejected() {
        let mut state = vote_open(4, P0);
        state.player_mut(P3).unwrap().is_bankrupt = true;

        assert_eq!(
            cast_vote(&mut state, P3, P0).unwrap_err(),
            RuleError::Rejected(Rejection::Bankrupt(P3))
        );
    }

    #[test]
    fn test_second_vote_cannot_open() {
        let mut state = vote_open(3, P0);
        assert_eq!(
            open_voteout(&mut state, P1, Millis(1)).unwrap_err(),
            RuleError::Rejected(Rejection::StaleTimer)
        );
    }

    #[test]
    fn test_cancel_for_target_only() {
        let mut state = vote_open(3, P0);

        cancel_for(&mut state, P1);
        assert!(state.voteout.is_some());

        cancel_for(&mut state, P0);
        assert!(state.voteout.is_none());
        assert_eq!(state.events.back(), Some(&GameEvent::VoteoutCancelled { target: P0 }));
    }

    #[test]
    fn test_bankrupt_holdout_completes_vote() {
        let mut state = vote_open(4, P0);
        cast_vote(&mut state, P1, P0).unwrap();
        cast_vote(&mut state, P2, P0).unwrap();
        assert!(!state.player(P0).unwrap().is_bankrupt);

        debt::declare_bankruptcy(&mut state, P3).unwrap();

        assert!(state.player(P0).unwrap().is_bankrupt);
        assert!(state.voteout.is_none());
        assert!(state.events.contains(&GameEvent::PlayerVotedOut { target: P0 }));
        assert_eq!(state.current_player(), Ok(P1));
    }

    #[test]
    fn test_bankrupt_voter_leaves_vote_open_when_others_pending() {
        let mut state = vote_open(4, P0);
        cast_vote(&mut state, P1, P0).unwrap();

        debt::declare_bankruptcy(&mut state, P1).unwrap();

        let vote = state.voteout.as_ref().unwrap();
        assert!(vote.voters.is_empty());
        assert!(!state.player(P0).unwrap().is_bankrupt);
    }
}
