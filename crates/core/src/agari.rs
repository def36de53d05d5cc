//! Completion check for a 14-tile single-suit hand: one pair plus four melds.

use crate::{rank_counts, Tile, RANKS};
use serde::{Deserialize, Serialize};

/// Tiles a completed hand must hold.
pub const COMPLETE_LEN: usize = 14;
const MELDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meld {
    Triplet(Tile),
    /// Three consecutive ranks starting at the given tile.
    Run(Tile),
}

impl Meld {
    /// `None` for a run starting above rank 7, which would leave the suit.
    pub fn tiles(self) -> Option<[Tile; 3]> {
        match self {
            Meld::Triplet(tile) => Some([tile; 3]),
            Meld::Run(start) => {
                let rank = start.rank();
                Some([start, Tile::new(rank + 1)?, Tile::new(rank + 2)?])
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub pair: Tile,
    pub melds: [Meld; MELDS],
}

pub fn is_complete(tiles: &[Tile]) -> bool {
    find_completion(tiles).is_some()
}

/// Returns the first decomposition found, trying pair ranks ascending and
/// triplets before runs at each rank. Anything other than 14 tiles never
/// completes.
pub fn find_completion(tiles: &[Tile]) -> Option<Completion> {
    if tiles.len() != COMPLETE_LEN {
        return None;
    }
    let mut counts = rank_counts(tiles);
    for pair in Tile::ALL {
        if counts[pair.index()] < 2 {
            continue;
        }
        counts[pair.index()] -= 2;
        let mut melds = Vec::with_capacity(MELDS);
        let found = try_melds(&mut counts, &mut melds);
        counts[pair.index()] += 2;
        if found {
            let melds: [Meld; MELDS] = melds.try_into().ok()?;
            return Some(Completion { pair, melds });
        }
    }
    None
}

fn try_melds(counts: &mut [u8; RANKS], melds: &mut Vec<Meld>) -> bool {
    if melds.len() == MELDS {
        return counts.iter().all(|count| *count == 0);
    }
    // The lowest remaining rank has to be consumed here; skipping it would
    // strand tiles.
    let Some(rank) = counts.iter().position(|count| *count > 0) else {
        return false;
    };
    let tile = Tile::ALL[rank];

    if counts[rank] >= 3 {
        counts[rank] -= 3;
        melds.push(Meld::Triplet(tile));
        if try_melds(counts, melds) {
            counts[rank] += 3;
            return true;
        }
        melds.pop();
        counts[rank] += 3;
    }

    if rank + 2 < RANKS && counts[rank + 1] > 0 && counts[rank + 2] > 0 {
        for offset in 0..3 {
            counts[rank + offset] -= 1;
        }
        melds.push(Meld::Run(tile));
        let found = try_melds(counts, melds);
        for offset in 0..3 {
            counts[rank + offset] += 1;
        }
        if found {
            return true;
        }
        melds.pop();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hand;

    fn tiles(ranks: &[u8]) -> Vec<Tile> {
        Hand::from_ranks(ranks).expect("ranks").tiles().to_vec()
    }

    #[test]
    fn counts_are_restored_after_search() {
        let hand = tiles(&[0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5, 6]);
        let before = rank_counts(&hand);
        assert!(is_complete(&hand));
        assert_eq!(rank_counts(&hand), before);
    }

    #[test]
    fn melds_and_pair_cover_every_tile() {
        let hand = tiles(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 8, 8, 4, 4, 5]);
        let completion = find_completion(&hand).expect("complete");
        let mut used = vec![completion.pair, completion.pair];
        for meld in completion.melds {
            used.extend(meld.tiles().expect("meld in suit"));
        }
        used.sort_unstable();
        assert_eq!(used, hand);
    }

    #[test]
    fn runs_off_the_top_of_the_suit_have_no_tiles() {
        assert_eq!(Meld::Run(Tile::ALL[7]).tiles(), None);
        assert_eq!(Meld::Run(Tile::ALL[8]).tiles(), None);
        assert_eq!(
            Meld::Run(Tile::ALL[6]).tiles(),
            Some([Tile::ALL[6], Tile::ALL[7], Tile::ALL[8]])
        );
        let decoded: Meld = serde_json::from_str(r#"{"Run":8}"#).expect("decode");
        assert_eq!(decoded.tiles(), None);
    }

    #[test]
    fn thirteen_tiles_never_complete() {
        let hand = tiles(&[0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 5]);
        assert_eq!(find_completion(&hand), None);
    }
}
