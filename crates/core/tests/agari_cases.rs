use pinzu_core::{find_completion, is_complete, Hand, Meld, Tile};

fn hand(ranks: &[u8]) -> Hand {
    Hand::from_ranks(ranks).expect("valid ranks")
}

macro_rules! complete_case {
    ($name:ident, $ranks:expr, $pair:expr) => {
        #[test]
        fn $name() {
            let hand = hand(&$ranks);
            let completion = find_completion(hand.tiles()).expect("hand should complete");
            assert_eq!(completion.pair.rank(), $pair);
        }
    };
}

macro_rules! incomplete_case {
    ($name:ident, $ranks:expr) => {
        #[test]
        fn $name() {
            let hand = hand(&$ranks);
            assert!(!is_complete(hand.tiles()));
        }
    };
}

complete_case!(
    pair_with_three_triplets_and_run,
    [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5, 6],
    0
);
complete_case!(
    nine_gates_shape,
    [0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 8, 8, 4],
    4
);
complete_case!(
    mostly_runs,
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 0, 1, 2, 4, 4],
    4
);
complete_case!(
    all_triplets,
    [0, 0, 0, 2, 2, 2, 4, 4, 4, 6, 6, 6, 8, 8],
    8
);
complete_case!(
    four_triplets_read_as_runs,
    [0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4],
    1
);
complete_case!(
    doubled_runs,
    [0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6],
    0
);
complete_case!(
    four_of_a_kind_split,
    [0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 8, 8],
    8
);
complete_case!(
    triplet_then_runs,
    [1, 1, 1, 2, 3, 4, 4, 4, 5, 5, 6, 6, 7, 7],
    1
);

incomplete_case!(
    alternating_pairs,
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 0, 2, 4, 6, 8]
);
incomplete_case!(
    isolated_middle_tile,
    [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 5, 7, 8]
);
incomplete_case!(seven_pairs, [0, 0, 2, 2, 4, 4, 6, 6, 8, 8, 1, 1, 3, 3]);
incomplete_case!(
    stranded_after_triplets,
    [0, 0, 0, 1, 2, 3, 3, 3, 4, 5, 6, 7, 8, 8]
);
incomplete_case!(
    quads_without_neighbors,
    [0, 0, 0, 0, 2, 2, 2, 2, 4, 4, 4, 4, 6, 6]
);

#[test]
fn triplet_is_preferred_over_run_at_the_same_rank() {
    let hand = hand(&[0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5, 6]);
    let completion = find_completion(hand.tiles()).expect("complete");
    assert_eq!(
        completion.melds,
        [
            Meld::Triplet(Tile::ALL[1]),
            Meld::Triplet(Tile::ALL[2]),
            Meld::Triplet(Tile::ALL[3]),
            Meld::Run(Tile::ALL[4]),
        ]
    );
}

#[test]
fn short_and_long_hands_are_rejected() {
    assert!(!is_complete(hand(&[0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5]).tiles()));
    assert!(!is_complete(
        hand(&[0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5, 6, 7]).tiles()
    ));
    assert!(!is_complete(&[]));
}
