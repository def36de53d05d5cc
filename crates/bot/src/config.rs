use crate::{BotIdentity, GameStore, MemoryStore, SqliteStore};
use anyhow::{bail, Context};
use pinzu_core::GameConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

pub const CONFIG_ENV: &str = "PINZU_CONFIG";
const BIND_ENV: &str = "PINZU_BIND";
const DATABASE_ENV: &str = "PINZU_DATABASE";
const PUBKEY_ENV: &str = "PINZU_BOT_PUBKEY";
const SEED_ENV: &str = "PINZU_SEED";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// SQLite file; games live only in memory when unset.
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub bot_pubkey: Option<String>,
    #[serde(default)]
    pub game: GameConfig,
}

fn default_bind() -> String {
    "0.0.0.0:8989".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            database: None,
            bot_pubkey: None,
            game: GameConfig::default(),
        }
    }
}

impl BotConfig {
    /// Overlays `PINZU_*` variables looked up through `var`.
    pub fn apply_overrides<F>(&mut self, var: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = var(BIND_ENV) {
            self.bind = bind;
        }
        if let Some(database) = var(DATABASE_ENV) {
            self.database = Some(PathBuf::from(database));
        }
        if let Some(pubkey) = var(PUBKEY_ENV) {
            self.bot_pubkey = Some(pubkey);
        }
        if let Some(seed) = var(SEED_ENV) {
            let seed = seed
                .trim()
                .parse::<u64>()
                .with_context(|| format!("parse {SEED_ENV}={seed}"))?;
            self.game.seed = Some(seed);
        }
        Ok(())
    }

    pub fn identity(&self) -> anyhow::Result<BotIdentity> {
        let Some(pubkey) = self.bot_pubkey.as_deref() else {
            bail!("bot public key missing: set {PUBKEY_ENV} or bot_pubkey");
        };
        BotIdentity::from_hex(pubkey).context("load bot identity")
    }

    pub fn open_store(&self) -> anyhow::Result<Arc<dyn GameStore>> {
        match &self.database {
            Some(path) => {
                let store = SqliteStore::open(path)
                    .with_context(|| format!("open database {}", path.display()))?;
                Ok(Arc::new(store))
            }
            None => {
                warn!("no database configured; games are lost on restart");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

pub fn load_bot_config_file(path: &Path) -> anyhow::Result<BotConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

/// File named by `PINZU_CONFIG` (if any), then environment overrides.
pub fn load_bot_config() -> anyhow::Result<BotConfig> {
    let mut config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_bot_config_file(Path::new(&path))?,
        None => BotConfig::default(),
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}
