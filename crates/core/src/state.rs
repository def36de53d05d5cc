use crate::{
    find_completion, Completion, DrawPile, EventBus, GameConfig, GameEvent, Hand, RngState, Tile,
    COMPLETE_LEN,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("no tile at position {position} (hand holds {len})")]
    InvalidSelector { position: usize, len: usize },
    #[error("no more tiles")]
    PileExhausted,
}

/// Hand, draw pile and turn counter of one game. Ownership and message
/// identity live with the stored record, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub hand: Hand,
    pub pile: DrawPile,
    pub turn: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discard {
    pub dropped: Tile,
    /// `None` when the pile ran out and the hand stays at 13 tiles.
    pub drawn: Option<Tile>,
}

impl Discard {
    pub fn pile_exhausted(&self) -> bool {
        self.drawn.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Win { completion: Completion, turn: u32 },
    Misjudge { turn: u32 },
}

impl CheckOutcome {
    /// Completed on the opening deal without a single discard.
    pub fn is_first_turn_win(&self) -> bool {
        matches!(self, CheckOutcome::Win { turn: 1, .. })
    }
}

impl GameState {
    pub fn deal(config: &GameConfig, rng: &mut RngState, events: &mut EventBus) -> Self {
        let mut pile = DrawPile::full();
        let mut hand = Hand::new();
        for tile in pile.draw_many(COMPLETE_LEN, config.draw_policy, rng) {
            hand.insert(tile);
        }
        events.push(GameEvent::Dealt {
            tiles: hand.len(),
            pile_left: pile.remaining(),
        });
        Self {
            hand,
            pile,
            turn: 1,
        }
    }

    /// Discards the tile at a 1-based position of the sorted hand and draws
    /// a replacement.
    pub fn drop_tile(
        &mut self,
        position: usize,
        config: &GameConfig,
        rng: &mut RngState,
        events: &mut EventBus,
    ) -> Result<Discard, GameError> {
        if self.hand.len() < COMPLETE_LEN && self.pile.is_empty() {
            return Err(GameError::PileExhausted);
        }
        let len = self.hand.len();
        let dropped = self
            .hand
            .remove_at(position)
            .ok_or(GameError::InvalidSelector { position, len })?;
        events.push(GameEvent::Dropped {
            position,
            tile: dropped,
            turn: self.turn,
        });

        let drawn = self.pile.draw(config.draw_policy, rng);
        match drawn {
            Some(tile) => {
                self.hand.insert(tile);
                events.push(GameEvent::Drew {
                    tile,
                    pile_left: self.pile.remaining(),
                });
            }
            None => events.push(GameEvent::PileExhausted {
                hand: self.hand.len(),
            }),
        }
        self.turn += 1;
        Ok(Discard { dropped, drawn })
    }

    pub fn check(&self, events: &mut EventBus) -> CheckOutcome {
        match find_completion(self.hand.tiles()) {
            Some(completion) => {
                events.push(GameEvent::Completed {
                    completion,
                    turn: self.turn,
                });
                CheckOutcome::Win {
                    completion,
                    turn: self.turn,
                }
            }
            None => {
                events.push(GameEvent::Misjudged { turn: self.turn });
                CheckOutcome::Misjudge { turn: self.turn }
            }
        }
    }
}
