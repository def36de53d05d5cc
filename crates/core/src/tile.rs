use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ranks in the single modeled suit.
pub const RANKS: usize = 9;

/// One tile of the circle suit, identified only by its rank (0..=8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tile(u8);

impl Tile {
    pub const ALL: [Tile; RANKS] = [
        Tile(0),
        Tile(1),
        Tile(2),
        Tile(3),
        Tile(4),
        Tile(5),
        Tile(6),
        Tile(7),
        Tile(8),
    ];

    pub fn new(rank: u8) -> Option<Self> {
        if (rank as usize) < RANKS {
            Some(Self(rank))
        } else {
            None
        }
    }

    pub fn rank(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Face value as printed on the tile (1..=9).
    pub fn face(self) -> u8 {
        self.0 + 1
    }

    /// Unicode glyph for the circle tile of this rank.
    pub fn glyph(self) -> char {
        char::from_u32(0x1F019 + self.0 as u32).unwrap_or('?')
    }
}

impl TryFrom<u8> for Tile {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tile::new(value).ok_or_else(|| format!("tile rank out of range: {value}"))
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> Self {
        tile.0
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.face())
    }
}

/// Tiles held by the player, kept sorted ascending by rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    pub fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    pub fn from_tiles(mut tiles: Vec<Tile>) -> Self {
        tiles.sort_unstable();
        Self { tiles }
    }

    /// Builds a hand from raw ranks, rejecting anything outside 0..=8.
    pub fn from_ranks(ranks: &[u8]) -> Option<Self> {
        let tiles = ranks
            .iter()
            .map(|rank| Tile::new(*rank))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::from_tiles(tiles))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn insert(&mut self, tile: Tile) {
        let at = self.tiles.partition_point(|held| *held <= tile);
        self.tiles.insert(at, tile);
    }

    /// Removes the tile at a 1-based position of the sorted hand.
    pub fn remove_at(&mut self, position: usize) -> Option<Tile> {
        if position == 0 || position > self.tiles.len() {
            return None;
        }
        Some(self.tiles.remove(position - 1))
    }

    pub fn counts(&self) -> [u8; RANKS] {
        rank_counts(&self.tiles)
    }
}

impl From<Vec<Tile>> for Hand {
    fn from(tiles: Vec<Tile>) -> Self {
        Hand::from_tiles(tiles)
    }
}

impl From<Hand> for Vec<Tile> {
    fn from(hand: Hand) -> Self {
        hand.tiles
    }
}

pub fn rank_counts(tiles: &[Tile]) -> [u8; RANKS] {
    let mut counts = [0u8; RANKS];
    for tile in tiles {
        counts[tile.index()] = counts[tile.index()].saturating_add(1);
    }
    counts
}
