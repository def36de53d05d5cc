use crate::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("malformed event: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("invalid bot identity: {0}")]
    InvalidIdentity(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("render error: {0}")]
    Render(String),
}
