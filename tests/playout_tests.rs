//! Randomized whole-game checks.
//!
//! A seeded driver plays games by picking uniformly among legal actions,
//! then the ledger invariants are checked after every step.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use monopoly_engine::board::{Group, TileId, BOARD_SIZE, HOTEL};
use monopoly_engine::core::{Action, GameRng, GameState, PendingAction, PlayerId, RulesConfig};
use monopoly_engine::events::GameEvent;
use monopoly_engine::rules::{replay, Monopoly, RulesEngine};

/// Who the game is waiting on, in the order the engine gates them.
fn actor(state: &GameState, chooser: &mut ChaCha8Rng) -> Option<PlayerId> {
    if state.is_over() {
        return None;
    }
    if let Some(debtor) = state.debtor() {
        return Some(debtor);
    }
    match &state.pending_action {
        Some(PendingAction::BuyProperty { player, .. }) => Some(*player),
        Some(PendingAction::Auction(auction)) => auction.active_bidders.choose(chooser).copied(),
        None => state.current_player().ok(),
    }
}

/// Play up to `steps` actions. Returns the final state.
fn play(
    rules: &Monopoly,
    players: usize,
    seed: u64,
    steps: usize,
    mut check: impl FnMut(&GameState),
) -> GameState {
    let names: Vec<String> = (0..players).map(|i| format!("bot{i}")).collect();
    let mut state = rules.new_game(&names).unwrap();
    let mut dice = GameRng::new(seed);
    let mut chooser = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);

    for _ in 0..steps {
        let Some(player) = actor(&state, &mut chooser) else {
            break;
        };

        let mut actions = rules.legal_actions(&state, player);
        if actions.len() > 1 {
            // Giving up is always legal; keep it rare so games run long.
            let keep_bankruptcy = chooser.gen_ratio(1, 200);
            actions.retain(|a| keep_bankruptcy || *a != Action::DeclareBankruptcy);
        }
        let Some(action) = actions.choose(&mut chooser).cloned() else {
            break;
        };

        let step = rules.apply_action(&state, player, &action, &mut dice).unwrap();
        assert!(
            step.is_applied(),
            "listed action {action:?} for {player} was rejected: {:?}",
            step.rejection
        );
        state = step.state;
        check(&state);
    }
    state
}

fn check_invariants(rules: &Monopoly, state: &GameState) {
    for player in state.players.iter() {
        assert!(player.money >= 0, "{} has negative cash", player.id);
        assert!(player.position.0 < BOARD_SIZE);
        if player.is_bankrupt {
            assert_eq!(player.money, 0);
            assert!(player.debt.is_none());
            assert_eq!(state.properties_of(player.id).count(), 0);
        }
    }

    for record in state.properties.values() {
        assert!(record.houses <= HOTEL);
        assert!(
            !(record.is_mortgaged && record.houses > 0), "{} mortgaged with houses", record.tile
        );
        assert!(rules.board().property(record.tile).is_some());
    }

    let groups = [
        Group::Brown,
        Group::LightBlue,
        Group::Pink,
        Group::Orange,
        Group::Red,
        Group::Yellow,
        Group::Green,
        Group::DarkBlue,
    ];
    for group in groups {
        let houses: Vec<u8> = rules
            .board()
            .group_members(group)
            .iter()
            .map(|&tile| state.ownership(tile).map_or(0, |r| r.houses))
            .collect();
        let spread = houses.iter().max().unwrap_or(&0) - houses.iter().min().unwrap_or(&0);
        assert!(spread <= 1, "{group:?} built unevenly: {houses:?}");
    }

    assert!(state.players.iter().filter(|p| p.debt.is_some()).count() <= 1);

    let game_overs =
        state.events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count();
    assert!(game_overs <= 1);
    assert_eq!(state.winner.is_some(), state.active_count() == 1);
}

#[test]
fn test_random_games_keep_invariants() {
    let rules = Monopoly::new(RulesConfig::default());
    for seed in 0..8 {
        let players = 2 + (seed as usize % 3);
        play(&rules, players, seed, 600, |state| check_invariants(&rules, state));
    }
}

#[test]
fn test_random_game_replays() {
    let rules = Monopoly::new(RulesConfig::default());
    let names: Vec<String> = (0..4).map(|i| format!("bot{i}")).collect();
    let initial = rules.new_game(&names).unwrap();

    let end = play(&rules, 4, 99, 500, |_| {});
    let history: Vec<_> = end.history.iter().cloned().collect();
    let rebuilt = replay(&rules, &initial, &history).unwrap();

    assert_eq!(rebuilt, end);
}

#[test]
fn test_same_seed_same_game() {
    let rules = Monopoly::new(RulesConfig::default());
    let a = play(&rules, 3, 7, 400, |_| {});
    let b = play(&rules, 3, 7, 400, |_| {});
    assert_eq!(a, b);
}

#[test]
fn test_snapshot_of_random_game_roundtrips() {
    let rules = Monopoly::new(RulesConfig::default());
    let state = play(&rules, 3, 11, 300, |_| {});

    let bytes = state.encode().unwrap();
    assert_eq!(GameState::decode(&bytes).unwrap(), state);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_games_keep_invariants(seed in any::<u64>(), players in 2usize..=4) {
        let rules = Monopoly::new(RulesConfig::default());
        play(&rules, players, seed, 300, |state| check_invariants(&rules, state));
    }

    #[test]
    fn prop_movement_wraps_and_pays_go(start in 0u8..BOARD_SIZE, steps in 2u8..=12) {
        let (to, passed) = TileId::new(start).advance(steps);
        prop_assert_eq!(to.0, (start + steps) % BOARD_SIZE);
        prop_assert_eq!(passed, start + steps >= BOARD_SIZE);
    }

    #[test]
    fn prop_rejections_leave_state_untouched(seed in any::<u64>(), bid in -50i64..0) {
        let rules = Monopoly::new(RulesConfig::default());
        let state = play(&rules, 3, seed, 40, |_| {});
        let mut dice = GameRng::new(seed);

        for player in PlayerId::all(3) {
            let step = rules
                .apply_action(&state, player, &Action::PlaceBid { amount: bid }, &mut dice)
                .unwrap();
            if step.rejection.is_some() {
                prop_assert_eq!(&step.state, &state);
            }
        }
    }
}
