use crate::{DrawPolicy, RngState, Tile, RANKS};
use serde::{Deserialize, Serialize};

/// Copies of each rank in a fresh pile.
pub const COPIES_PER_RANK: u8 = 4;

/// Undrawn tiles, tracked as a remaining count per rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawPile {
    counts: [u8; RANKS],
}

impl DrawPile {
    pub fn full() -> Self {
        Self {
            counts: [COPIES_PER_RANK; RANKS],
        }
    }

    pub fn from_counts(counts: [u8; RANKS]) -> Self {
        Self { counts }
    }

    pub fn empty() -> Self {
        Self { counts: [0; RANKS] }
    }

    pub fn counts(&self) -> [u8; RANKS] {
        self.counts
    }

    pub fn remaining(&self) -> usize {
        self.counts.iter().map(|count| *count as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes one tile, or `None` without touching the pile when it is empty.
    pub fn draw(&mut self, policy: DrawPolicy, rng: &mut RngState) -> Option<Tile> {
        let remaining = self.remaining();
        if remaining == 0 {
            return None;
        }
        let index = match policy {
            DrawPolicy::UniformTile => {
                let mut pick = rng.below(remaining);
                let mut chosen = 0;
                for (index, count) in self.counts.iter().enumerate() {
                    let count = *count as usize;
                    if pick < count {
                        chosen = index;
                        break;
                    }
                    pick -= count;
                }
                chosen
            }
            DrawPolicy::UniformRank => loop {
                let index = rng.below(RANKS);
                if self.counts[index] > 0 {
                    break index;
                }
            },
        };
        self.counts[index] -= 1;
        Some(Tile::ALL[index])
    }

    pub fn draw_many(&mut self, count: usize, policy: DrawPolicy, rng: &mut RngState) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(tile) = self.draw(policy, rng) {
                tiles.push(tile);
            } else {
                break;
            }
        }
        tiles
    }
}
