use crate::{BotError, BotIdentity};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const KIND_TEXT_NOTE: u32 = 1;

/// `["e", <event id>, <relay>, <marker>]`, `["p", <pubkey>]`, ...
pub type Tag = Vec<String>;

/// A protocol event as delivered by the relay bridge and as handed back to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u32,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub content: String,
    /// Attached by the bridge that publishes the event; the bot leaves it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

impl Event {
    pub fn from_json(body: &str) -> Result<Self, BotError> {
        serde_json::from_str(body).map_err(BotError::Malformed)
    }

    /// Id of the message this one answers: the `e` tag marked `reply` if any,
    /// otherwise the last `e` tag.
    pub fn reference(&self) -> Option<&str> {
        let marked = self
            .tags
            .iter()
            .filter(|tag| tag_key(tag) == Some("e") && tag.len() > 3 && tag[3] == "reply")
            .last();
        marked
            .or_else(|| {
                self.tags
                    .iter()
                    .filter(|tag| tag_key(tag) == Some("e") && tag.len() > 1)
                    .last()
            })
            .map(|tag| tag[1].as_str())
    }

    /// Builds the bot's answer to `inbound`. Text notes start from a clean tag
    /// list; other kinds keep their non-`e`/`p` tags (channel ids and such).
    pub fn reply(inbound: &Event, identity: &BotIdentity, content: String, created_at: i64) -> Self {
        let mut tags: Vec<Tag> = if inbound.kind == KIND_TEXT_NOTE {
            Vec::new()
        } else {
            inbound
                .tags
                .iter()
                .filter(|tag| !matches!(tag_key(tag), Some("e") | Some("p")))
                .cloned()
                .collect()
        };
        append_unique(&mut tags, vec!["e".to_string(), inbound.id.clone()]);
        append_unique(&mut tags, vec!["p".to_string(), inbound.pubkey.clone()]);

        let mut event = Event {
            id: String::new(),
            pubkey: identity.public_key().to_string(),
            created_at,
            kind: inbound.kind,
            tags,
            content,
            sig: None,
        };
        event.id = event.compute_id();
        event
    }

    /// sha256 over `[0, pubkey, created_at, kind, tags, content]`.
    pub fn compute_id(&self) -> String {
        let canonical = serde_json::json!([
            0,
            self.pubkey,
            self.created_at,
            self.kind,
            self.tags,
            self.content
        ]);
        digest_hex(canonical.to_string().as_bytes())
    }
}

pub fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn tag_key(tag: &Tag) -> Option<&str> {
    tag.first().map(String::as_str)
}

fn append_unique(tags: &mut Vec<Tag>, tag: Tag) {
    let prefix = tag.len().min(2);
    let exists = tags
        .iter()
        .any(|held| held.len() >= prefix && held[..prefix] == tag[..prefix]);
    if !exists {
        tags.push(tag);
    }
}
