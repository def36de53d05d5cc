use crate::{GameRecord, GameStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of resolving a referenced message to a game for a given actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(GameRecord),
    /// No reference, or the referenced message is not the latest of any game.
    Unknown,
    /// The game exists but belongs to someone else.
    Denied,
}

/// Links successive bot messages into one game: the live record is always
/// keyed by the newest message, and older ids stop resolving.
#[derive(Clone)]
pub struct SessionChain {
    store: Arc<dyn GameStore>,
}

impl SessionChain {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    pub fn resolve(&self, reference: Option<&str>, actor: &str) -> Result<Access, StoreError> {
        let Some(reference) = reference else {
            return Ok(Access::Unknown);
        };
        match self.store.get(reference)? {
            None => Ok(Access::Unknown),
            Some(record) if record.owner != actor => {
                debug!(reference, actor, "rejected command from non-owner");
                Ok(Access::Denied)
            }
            Some(record) => Ok(Access::Granted(record)),
        }
    }

    pub fn open(&self, record: &GameRecord) -> Result<(), StoreError> {
        self.store.insert(record)?;
        info!(id = %record.id, owner = %record.owner, "game started");
        Ok(())
    }

    /// Moves the game from `previous_id` to the message carried by `record`.
    pub fn advance(&self, previous_id: &str, record: &GameRecord) -> Result<(), StoreError> {
        self.store.replace(previous_id, record)?;
        debug!(from = previous_id, to = %record.id, turn = record.state.turn, "game advanced");
        Ok(())
    }

    pub fn close(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.store.remove(id)?;
        info!(id, removed, "game closed");
        Ok(removed)
    }
}
