use pinzu_core::{
    CheckOutcome, DrawPile, EventBus, GameConfig, GameError, GameEvent, GameState, Hand, RngState,
    COPIES_PER_RANK, RANKS,
};

fn new_game(seed: u64) -> (GameState, GameConfig, RngState, EventBus) {
    let config = GameConfig::default();
    let mut rng = RngState::from_seed(seed);
    let mut events = EventBus::default();
    let game = GameState::deal(&config, &mut rng, &mut events);
    (game, config, rng, events)
}

fn seeded(ranks: &[u8], pile: DrawPile, turn: u32) -> GameState {
    GameState {
        hand: Hand::from_ranks(ranks).expect("ranks"),
        pile,
        turn,
    }
}

#[test]
fn deal_hands_out_fourteen_sorted_tiles() {
    let (game, _, _, mut events) = new_game(9);
    assert_eq!(game.hand.len(), 14);
    assert_eq!(game.pile.remaining(), 22);
    assert_eq!(game.turn, 1);
    assert!(game.hand.tiles().windows(2).all(|pair| pair[0] <= pair[1]));
    let drained: Vec<_> = events.drain().collect();
    assert_eq!(
        drained,
        vec![GameEvent::Dealt {
            tiles: 14,
            pile_left: 22
        }]
    );
}

#[test]
fn deal_never_exceeds_copies_per_rank() {
    for seed in 0..50 {
        let (game, _, _, _) = new_game(seed);
        let counts = game.hand.counts();
        let pile = game.pile.counts();
        for rank in 0..RANKS {
            assert_eq!(counts[rank] + pile[rank], COPIES_PER_RANK, "seed {seed} rank {rank}");
        }
    }
}

#[test]
fn drop_replaces_tile_and_advances_turn() {
    let (mut game, config, mut rng, mut events) = new_game(21);
    let target = game.hand.tiles()[3];
    let discard = game
        .drop_tile(4, &config, &mut rng, &mut events)
        .expect("drop");
    assert_eq!(discard.dropped, target);
    assert!(!discard.pile_exhausted());
    assert_eq!(game.hand.len(), 14);
    assert_eq!(game.pile.remaining(), 21);
    assert_eq!(game.turn, 2);
}

#[test]
fn drop_rejects_out_of_range_positions() {
    let (mut game, config, mut rng, mut events) = new_game(4);
    let before = game.clone();
    for position in [0, 15, 99] {
        let err = game
            .drop_tile(position, &config, &mut rng, &mut events)
            .unwrap_err();
        assert_eq!(err, GameError::InvalidSelector { position, len: 14 });
    }
    assert_eq!(game, before);
}

#[test]
fn drop_on_empty_pile_leaves_thirteen_tiles() {
    let config = GameConfig::default();
    let mut rng = RngState::from_seed(1);
    let mut events = EventBus::default();
    let mut game = seeded(&[0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5, 8], DrawPile::empty(), 22);

    let discard = game
        .drop_tile(14, &config, &mut rng, &mut events)
        .expect("drop completes");
    assert!(discard.pile_exhausted());
    assert_eq!(game.hand.len(), 13);
    assert_eq!(game.turn, 23);
    assert!(events
        .drain()
        .any(|event| event == GameEvent::PileExhausted { hand: 13 }));

    let err = game
        .drop_tile(1, &config, &mut rng, &mut events)
        .unwrap_err();
    assert_eq!(err, GameError::PileExhausted);
    assert_eq!(game.hand.len(), 13);
    assert_eq!(game.turn, 23);

    assert_eq!(
        game.check(&mut events),
        CheckOutcome::Misjudge { turn: 23 }
    );
}

#[test]
fn check_reports_first_turn_honor() {
    let mut events = EventBus::default();
    let game = seeded(
        &[0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5, 6],
        DrawPile::full(),
        1,
    );
    let outcome = game.check(&mut events);
    assert!(matches!(outcome, CheckOutcome::Win { .. }));
    assert!(outcome.is_first_turn_win());

    let later = GameState { turn: 5, ..game };
    let outcome = later.check(&mut events);
    assert!(matches!(outcome, CheckOutcome::Win { .. }));
    assert!(!outcome.is_first_turn_win());
}

#[test]
fn check_reports_misjudge() {
    let mut events = EventBus::default();
    let game = seeded(
        &[0, 1, 2, 3, 4, 5, 6, 7, 8, 0, 2, 4, 6, 8],
        DrawPile::full(),
        3,
    );
    assert_eq!(game.check(&mut events), CheckOutcome::Misjudge { turn: 3 });
}

#[test]
fn state_serializes_ranks_as_integers() {
    let game = seeded(
        &[8, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5],
        DrawPile::from_counts([2; RANKS]),
        1,
    );
    let json = serde_json::to_value(&game).expect("serialize");
    assert_eq!(json["hand"][0], 0);
    assert_eq!(json["hand"][13], 8);
    assert_eq!(json["pile"], serde_json::json!([2, 2, 2, 2, 2, 2, 2, 2, 2]));
    let back: GameState = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, game);
}
