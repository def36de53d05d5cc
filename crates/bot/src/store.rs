use pinzu_core::{DrawPile, GameState, Hand};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

mod sqlite;

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("record already exists: {0}")]
    Duplicate(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// One live game, keyed by the id of the latest message that shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: String,
    pub owner: String,
    pub state: GameState,
    /// Unix seconds.
    pub created_at: i64,
}

impl GameRecord {
    /// Same game, re-keyed under the message that now represents it.
    pub fn rekeyed(self, id: String) -> Self {
        Self { id, ..self }
    }
}

/// Keyed store holding at most one record per logical game.
///
/// `replace` and `remove` are single transactions: a lookup after a failed
/// call sees the previous record untouched.
pub trait GameStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError>;
    fn insert(&self, record: &GameRecord) -> Result<(), StoreError>;
    /// Deletes `old_id` and inserts `record` atomically.
    fn replace(&self, old_id: &str, record: &GameRecord) -> Result<(), StoreError>;
    /// Returns whether a record was deleted.
    fn remove(&self, id: &str) -> Result<bool, StoreError>;
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// Column layout of the persisted game blob.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GameBlob {
    pub mountain: DrawPile,
    pub hai: Hand,
}

impl GameBlob {
    pub(crate) fn encode(state: &GameState) -> Result<String, StoreError> {
        let blob = GameBlob {
            mountain: state.pile.clone(),
            hai: state.hand.clone(),
        };
        Ok(serde_json::to_string(&blob)?)
    }

    pub(crate) fn decode(data: &str, turn: u32) -> Result<GameState, StoreError> {
        let blob: GameBlob = serde_json::from_str(data)?;
        Ok(GameState {
            hand: blob.hai,
            pile: blob.mountain,
            turn,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, GameRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(id).cloned())
    }

    fn insert(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        if records.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id.clone()));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn replace(&self, old_id: &str, record: &GameRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        if record.id != old_id && records.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id.clone()));
        }
        if records.remove(old_id).is_none() {
            warn!(old_id, new_id = %record.id, "replaced a record that was already gone");
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.remove(id).is_some())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }
}
