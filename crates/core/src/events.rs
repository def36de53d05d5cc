use crate::{Completion, Tile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum GameEvent {
    Dealt { tiles: usize, pile_left: usize },
    Dropped { position: usize, tile: Tile, turn: u32 },
    Drew { tile: Tile, pile_left: usize },
    PileExhausted { hand: usize },
    Completed { completion: Completion, turn: u32 },
    Misjudged { turn: u32 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<GameEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.queue.drain(..)
    }
}
