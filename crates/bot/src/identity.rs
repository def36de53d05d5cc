use crate::BotError;

/// Public identity the bot signs replies as. Built once at startup and handed
/// to the router; nothing reads it from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    public_key: String,
}

impl BotIdentity {
    /// Accepts a 32-byte x-only public key in hex.
    pub fn from_hex(public_key: &str) -> Result<Self, BotError> {
        let trimmed = public_key.trim();
        let bytes = hex::decode(trimmed)
            .map_err(|err| BotError::InvalidIdentity(format!("{trimmed}: {err}")))?;
        if bytes.len() != 32 {
            return Err(BotError::InvalidIdentity(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            public_key: hex::encode(bytes),
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}
