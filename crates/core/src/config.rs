use serde::{Deserialize, Serialize};

/// How the draw pile picks the next tile.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Every remaining tile instance is equally likely.
    #[default]
    UniformTile,
    /// Pick a rank uniformly and retry until it still has tiles. Favors ranks
    /// with few copies left once counts diverge; kept for replaying old games.
    UniformRank,
}

/// Tunable rules. Hand size and tile copies are fixed by the game and live
/// as constants next to the code that relies on them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    #[serde(default)]
    pub draw_policy: DrawPolicy,
    /// Fixed seed for reproducible deals. `None` seeds every game from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}
