//! Scripted games driven through the rules facade.
//!
//! Every test uses `ScriptedDice`, so the board positions below are exact.

use monopoly_engine::board::TileId;
use monopoly_engine::core::{
    Action, DebtCause, GameState, Input, Millis, PlayerId, PropertyOwnership, PurchaseMode,
    Rejection, RulesConfig, ScriptedDice, TurnPhase,
};
use monopoly_engine::engine::trade::TradeTerms;
use monopoly_engine::events::GameEvent;
use monopoly_engine::rules::{Monopoly, RulesEngine};

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);
const P2: PlayerId = PlayerId(2);
const P3: PlayerId = PlayerId(3);

/// Test harness: rules, committed state and the dice script.
struct Table {
    rules: Monopoly,
    state: GameState,
    dice: ScriptedDice,
}

impl Table {
    fn new(players: usize, rolls: &[(u8, u8)]) -> Self {
        Self::with_config(RulesConfig::default(), players, rolls)
    }

    fn with_config(config: RulesConfig, players: usize, rolls: &[(u8, u8)]) -> Self {
        let rules = Monopoly::new(config);
        let names: Vec<String> = (0..players).map(|i| format!("P{i}")).collect();
        let state = rules.new_game(&names).unwrap();
        Self { rules, state, dice: ScriptedDice::new(rolls.iter().copied()) }
    }

    /// Apply an action that must succeed.
    fn play(&mut self, player: PlayerId, action: Action) -> Vec<GameEvent> {
        let before = self.state.events.len();
        let step = self.rules.apply_action(&self.state, player, &action, &mut self.dice).unwrap();
        assert!(step.is_applied(), "{player} {action:?} rejected: {:?}", step.rejection);
        self.state = step.state;
        self.state.events_since(before).cloned().collect()
    }

    /// Apply a timer input that must succeed.
    fn fire(&mut self, input: Input) -> Vec<GameEvent> {
        let before = self.state.events.len();
        let step = self.rules.apply_input(&self.state, &input, &mut self.dice).unwrap();
        assert!(step.is_applied(), "{input:?} rejected: {:?}", step.rejection);
        self.state = step.state;
        self.state.events_since(before).cloned().collect()
    }

    fn turns_ended(&self) -> Vec<(PlayerId, PlayerId)> {
        self.state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TurnEnded { player, next_player } => Some((*player, *next_player)),
                _ => None,
            })
            .collect()
    }

    /// Apply an action that must be rejected.
    fn refuse(&mut self, player: PlayerId, action: Action) -> Rejection {
        let step = self.rules.apply_action(&self.state, player, &action, &mut self.dice).unwrap();
        assert_eq!(step.state, self.state, "rejected action changed the state");
        step.rejection.expect("action was applied")
    }

    fn own(&mut self, player: PlayerId, tile: u8, houses: u8) {
        let tile = TileId::new(tile);
        let mut record = PropertyOwnership::new(tile, player);
        record.houses = houses;
        self.state.properties.insert(tile, record);
    }

    fn money(&self, player: PlayerId) -> i64 {
        self.state.money(player)
    }

    fn set_money(&mut self, player: PlayerId, money: i64) {
        self.state.player_mut(player).unwrap().money = money;
    }
}

#[test]
fn test_buy_then_collect_rent() {
    let mut table = Table::new(2, &[(1, 2), (2, 1)]);

    let events = table.play(P0, Action::RollDice);
    assert_eq!(
        events.last(),
        Some(&GameEvent::PurchaseOffered { player: P0, tile: TileId::new(3), price: 60 })
    );
    table.refuse(P0, Action::EndTurn);

    table.play(P0, Action::BuyProperty);
    assert_eq!(table.money(P0), 1440);
    assert_eq!(table.state.owner_of(TileId::new(3)), Some(P0));

    table.play(P0, Action::EndTurn);
    let events = table.play(P1, Action::RollDice);

    assert!(events.contains(&GameEvent::RentPaid { payer: P1, owner: P0, amount: 4 }));
    assert_eq!(table.money(P0), 1444);
    assert_eq!(table.money(P1), 1496);
    assert_eq!(table.state.turn_phase, TurnPhase::AwaitingEndTurn);
}

#[test]
fn test_auto_purchase_mode() {
    let config = RulesConfig::default().with_purchase_mode(PurchaseMode::Auto);
    let mut table = Table::with_config(config, 2, &[(1, 2)]);

    table.play(P0, Action::RollDice);

    assert_eq!(table.state.owner_of(TileId::new(3)), Some(P0));
    assert!(table.state.pending_action.is_none());
}

#[test]
fn test_declined_property_is_auctioned() {
    let mut table = Table::new(2, &[(1, 2)]);
    table.set_money(P1, 500);

    table.play(P0, Action::RollDice);
    table.play(P0, Action::SkipProperty);
    assert!(table.state.auction().is_some());

    table.play(P1, Action::PlaceBid { amount: 300 });
    assert_eq!(table.refuse(P1, Action::PassAuction), Rejection::HighestBidderCannotPass);
    let events = table.play(P0, Action::PassAuction);

    assert!(
        events.contains(&GameEvent::AuctionWon { player: P1, tile: TileId::new(3), amount: 300 })
    );
    assert_eq!(table.money(P1), 200);
    assert_eq!(table.state.owner_of(TileId::new(3)), Some(P1));
    assert!(table.state.pending_action.is_none());

    // Winning does not end the mover's turn.
    assert_eq!(table.state.current_player(), Ok(P0));
    table.play(P0, Action::EndTurn);
}

#[test]
fn test_three_doubles_go_to_jail() {
    let mut table = Table::new(2, &[(2, 2), (3, 3), (4, 4), (1, 2)]);

    table.play(P0, Action::RollDice);
    assert_eq!(table.state.free_parking_pot, 200);
    table.play(P0, Action::RollDice);
    let events = table.play(P0, Action::RollDice);

    assert!(events.contains(&GameEvent::PlayerSentToJail { player: P0 }));
    let jailed = table.state.player(P0).unwrap();
    assert!(jailed.in_jail);
    assert_eq!(jailed.position, TileId::JAIL);
    assert_eq!(table.state.doubles_count, 0);
    assert_eq!(table.refuse(P0, Action::RollDice), Rejection::AlreadyRolled);

    table.play(P0, Action::EndTurn);
    table.play(P1, Action::RollDice);
    table.play(P1, Action::SkipProperty);
    table.play(P1, Action::PassAuction);
    table.play(P0, Action::PassAuction);

    assert_eq!(table.state.current_player(), Ok(P0));
    table.play(P0, Action::PayJailFine);
    assert!(!table.state.player(P0).unwrap().in_jail);
    assert_eq!(table.money(P0), 1250);
}

#[test]
fn test_debt_blocks_turn_until_settled() {
    let mut table = Table::new(2, &[(1, 2)]);
    table.own(P1, 3, 3);
    table.own(P0, 39, 0);
    table.set_money(P0, 100);

    let events = table.play(P0, Action::RollDice);
    assert!(events.contains(&GameEvent::DebtIncurred {
        player: P0,
        amount: 180,
        creditor: Some(P1),
        cause: DebtCause::Rent
    }));
    assert_eq!(table.money(P0), 100);
    assert_eq!(table.refuse(P0, Action::EndTurn), Rejection::InDebt(P0));

    let events = table.play(P0, Action::Mortgage { tile: TileId::new(39) });

    assert!(
        events.contains(&GameEvent::DebtResolved { player: P0, amount: 180, creditor: Some(P1) })
    );
    assert_eq!(table.money(P0), 120);
    assert_eq!(table.money(P1), 1680);
    table.play(P0, Action::EndTurn);
}

#[test]
fn test_unpayable_rent_bankrupts_and_ends_game() {
    let mut table = Table::new(2, &[(1, 2)]);
    table.own(P1, 3, 5);
    table.set_money(P0, 100);

    let events = table.play(P0, Action::RollDice);

    assert!(events.contains(&GameEvent::PlayerBankrupt { player: P0, caused_by: Some(P1) }));
    assert_eq!(events.last(), Some(&GameEvent::GameOver { winner: P1 }));
    assert_eq!(table.money(P1), 1600);
    assert_eq!(table.rules.is_terminal(&table.state).map(|r| r.winner), Some(P1));
    assert_eq!(table.refuse(P1, Action::RollDice), Rejection::GameOver);
}

#[test]
fn test_bankruptcy_in_three_player_game_continues() {
    let mut table = Table::new(3, &[(1, 2)]);
    table.own(P1, 3, 5);
    table.own(P2, 1, 0);
    table.set_money(P0, 10);

    table.play(P0, Action::RollDice);

    assert!(table.state.player(P0).unwrap().is_bankrupt);
    assert!(table.state.winner.is_none());
    assert_eq!(table.state.current_player(), Ok(P1));
    assert_eq!(table.state.turn_phase, TurnPhase::AwaitingRoll);
}

#[test]
fn test_mover_bankrupt_during_auction_hands_turn_to_next() {
    let mut table = Table::new(3, &[(1, 2)]);

    table.play(P0, Action::RollDice);
    table.play(P0, Action::SkipProperty);
    table.play(P0, Action::DeclareBankruptcy);

    assert!(table.state.auction().is_some());
    assert!(table.turns_ended().is_empty());

    let events = table.fire(Input::AuctionTimeout);

    assert!(events.contains(&GameEvent::AuctionEndedUnsold { tile: TileId::new(3) }));
    assert_eq!(table.state.current_player(), Ok(P1));
    assert_eq!(table.turns_ended(), vec![(P0, P1)]);
    table.play(P1, Action::RollDice);
}

#[test]
fn test_vote_completes_when_last_holdout_goes_bankrupt() {
    let mut table = Table::new(4, &[]);
    table.fire(Input::OpenVoteout { target: P0, at: Millis(60_000) });
    table.play(P1, Action::CastVote { target: P0 });
    table.play(P2, Action::CastVote { target: P0 });

    let events = table.play(P3, Action::DeclareBankruptcy);

    assert!(events.contains(&GameEvent::PlayerVotedOut { target: P0 }));
    assert!(table.state.player(P0).unwrap().is_bankrupt);
    assert!(table.state.voteout.is_none());
    assert_eq!(table.state.current_player(), Ok(P1));
}

#[test]
fn test_trade_accepted() {
    let mut table = Table::new(2, &[]);
    table.own(P0, 1, 0);
    table.own(P1, 3, 0);

    let terms = TradeTerms {
        offered_tiles: [TileId::new(1)].into_iter().collect(),
        requested_tiles: [TileId::new(3)].into_iter().collect(),
        requested_money: 50,
        ..TradeTerms::default()
    };
    table.play(P0, Action::ProposeTrade { to: P1, terms });
    let trade_id = table.state.pending_trades[0].id;

    assert!(table.rules.is_legal(&table.state, P1, &Action::AcceptTrade { trade_id }));
    assert!(!table.rules.is_legal(&table.state, P0, &Action::AcceptTrade { trade_id }));

    table.play(P1, Action::AcceptTrade { trade_id });

    assert_eq!(table.state.owner_of(TileId::new(1)), Some(P1));
    assert_eq!(table.state.owner_of(TileId::new(3)), Some(P0));
    assert_eq!(table.money(P0), 1550);
    assert_eq!(table.money(P1), 1450);
    assert!(table.state.pending_trades.is_empty());
}

#[test]
fn test_trade_rejected_changes_no_ledger() {
    let mut table = Table::new(2, &[]);
    table.own(P0, 1, 0);
    let properties = table.state.properties.clone();
    let players = table.state.players.clone();

    let terms = TradeTerms {
        offered_tiles: [TileId::new(1)].into_iter().collect(),
        ..TradeTerms::default()
    };
    table.play(P0, Action::ProposeTrade { to: P1, terms });
    let trade_id = table.state.pending_trades[0].id;
    table.play(P1, Action::RejectTrade { trade_id });

    assert_eq!(table.state.properties, properties);
    assert_eq!(table.state.players, players);
    assert_eq!(
        table.refuse(P1, Action::AcceptTrade { trade_id }),
        Rejection::UnknownTrade(trade_id)
    );
}

#[test]
fn test_building_through_facade() {
    let mut table = Table::new(2, &[]);
    table.own(P0, 1, 0);
    table.own(P0, 3, 0);

    table.play(P0, Action::BuildHouse { tile: TileId::new(1) });
    assert_eq!(
        table.refuse(P0, Action::BuildHouse { tile: TileId::new(1) }),
        Rejection::NonUniformBuilding(TileId::new(1))
    );
    table.play(P0, Action::BuildHouse { tile: TileId::new(3) });
    assert_eq!(table.money(P0), 1400);

    assert_eq!(
        table.refuse(P0, Action::Mortgage { tile: TileId::new(1) }),
        Rejection::HasBuildings(TileId::new(1))
    );
    table.play(P0, Action::BreakHouse { tile: TileId::new(1) });
    assert_eq!(table.money(P0), 1425);
}

#[test]
fn test_legal_actions_are_accepted() {
    let mut table = Table::new(3, &[(1, 2), (1, 2), (1, 2)]);
    table.own(P2, 1, 0);
    table.play(P0, Action::RollDice);

    for player in PlayerId::all(3) {
        for action in table.rules.legal_actions(&table.state, player) {
            let mut dice = ScriptedDice::new([(1, 2)]);
            let step = table.rules.apply_action(&table.state, player, &action, &mut dice).unwrap();
            assert!(step.is_applied(), "{player} {action:?}: {:?}", step.rejection);
        }
    }
}

#[test]
fn test_history_records_every_applied_input() {
    let mut table = Table::new(2, &[(1, 2)]);
    table.play(P0, Action::RollDice);
    table.refuse(P1, Action::RollDice);
    table.play(P0, Action::BuyProperty);

    let history: Vec<_> = table.state.history.iter().collect();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].dice.map(|d| d.sum()), Some(3));
    assert_eq!(history[1].dice, None);
    assert_eq!(history[1].sequence, 1);
}

#[test]
fn test_events_serialize_as_json() {
    let mut table = Table::new(2, &[(1, 2)]);
    let events = table.play(P0, Action::RollDice);

    let json = serde_json::to_string(&events).unwrap();
    assert!(json.contains(r#""DICE_ROLLED""#));
    let back: Vec<GameEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, events);
}

#[test]
fn test_config_from_json() {
    let json = r#"{"starting_money": 2000, "purchase_mode": "auto"}"#;
    let config = RulesConfig::from_json(json).unwrap();
    let table = Table::with_config(config, 2, &[]);

    assert_eq!(table.money(P0), 2000);
    assert_eq!(table.rules.config().purchase_mode, PurchaseMode::Auto);
    assert_eq!(table.rules.config().jail_fine, 50);
}
