use anyhow::Context;
use pinzu_bot::{
    digest_hex, BotIdentity, Command, CommandRouter, Event, GameStore, MemoryStore, SqliteStore,
    TextRenderer, KIND_TEXT_NOTE,
};
use pinzu_core::{DrawPolicy, GameConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const BOT_NAME: &str = "pinzu-cli-bot";

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    seed: Option<u64>,
    db: Option<PathBuf>,
    player: String,
    policy: DrawPolicy,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        seed: None,
        db: None,
        player: "local".to_string(),
        policy: DrawPolicy::default(),
    };
    let mut idx = 0usize;
    while idx < args.len() {
        let value = args.get(idx + 1);
        match (args[idx].as_str(), value) {
            ("--seed", Some(value)) => {
                options.seed = value.parse::<u64>().ok();
                idx += 1;
            }
            ("--db", Some(value)) => {
                options.db = Some(PathBuf::from(value));
                idx += 1;
            }
            ("--player", Some(value)) => {
                options.player = value.clone();
                idx += 1;
            }
            ("--policy", Some(value)) => {
                if value == "uniform_rank" {
                    options.policy = DrawPolicy::UniformRank;
                }
                idx += 1;
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

/// Plays against the router without a relay: each typed line becomes a text
/// note that replies to the bot's latest message.
struct LocalSession {
    router: CommandRouter,
    player: String,
    thread: Option<String>,
    serial: i64,
}

impl LocalSession {
    fn new(options: &CliOptions) -> anyhow::Result<Self> {
        let store: Arc<dyn GameStore> = match &options.db {
            Some(path) => Arc::new(
                SqliteStore::open(path).with_context(|| format!("open {}", path.display()))?,
            ),
            None => Arc::new(MemoryStore::new()),
        };
        let identity = BotIdentity::from_hex(&digest_hex(BOT_NAME.as_bytes()))?;
        let config = GameConfig {
            draw_policy: options.policy,
            seed: options.seed,
            ..GameConfig::default()
        };
        Ok(Self {
            router: CommandRouter::new(identity, store, Box::new(TextRenderer), config),
            player: digest_hex(options.player.as_bytes()),
            thread: None,
            serial: 0,
        })
    }

    fn message(&mut self, content: &str) -> Event {
        self.serial += 1;
        let reference = match Command::parse(content) {
            Some(Command::Start) => None,
            _ => self.thread.clone(),
        };
        let tags = reference
            .map(|parent| vec![vec!["e".to_string(), parent, String::new(), "reply".to_string()]])
            .unwrap_or_default();
        let mut event = Event {
            id: String::new(),
            pubkey: self.player.clone(),
            created_at: now_secs() + self.serial,
            kind: KIND_TEXT_NOTE,
            tags,
            content: content.to_string(),
            sig: None,
        };
        event.id = event.compute_id();
        event
    }

    fn send(&mut self, content: &str) -> anyhow::Result<Option<String>> {
        let inbound = self.message(content);
        let Some(reply) = self.router.handle(&inbound)? else {
            return Ok(None);
        };
        let store = self.router.chain().store();
        if store.get(&reply.id)?.is_some() {
            self.thread = Some(reply.id.clone());
        } else if let Some(thread) = &self.thread {
            if store.get(thread)?.is_none() {
                self.thread = None;
            }
        }
        Ok(Some(reply.content))
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim_end_matches(&['\n', '\r'][..]).to_string())
}

fn run(options: &CliOptions) -> anyhow::Result<()> {
    let mut session = LocalSession::new(options)?;
    println!("pinzu: type \"help\", \"start\", \"drop N\" or \"check\"; \"quit\" leaves.");
    while let Some(line) = read_line("> ") {
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }
        match session.send(&line)? {
            Some(content) => println!("{content}"),
            None => println!("(no reply)"),
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if let Err(err) = run(&options) {
        eprintln!("pinzu error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn options_parse_known_flags() {
        let options = parse_cli_options(&args(&[
            "--seed", "12", "--player", "alice", "--policy", "uniform_rank", "--bogus",
        ]));
        assert_eq!(options.seed, Some(12));
        assert_eq!(options.player, "alice");
        assert_eq!(options.policy, DrawPolicy::UniformRank);
        assert_eq!(options.db, None);
    }

    #[test]
    fn dangling_flag_is_ignored() {
        let options = parse_cli_options(&args(&["--seed"]));
        assert_eq!(options.seed, None);
    }

    #[test]
    fn session_follows_the_latest_bot_message() {
        let options = parse_cli_options(&args(&["--seed", "3"]));
        let mut session = LocalSession::new(&options).expect("session");
        assert_eq!(session.send("hello").expect("send"), None);

        session.send("start").expect("send").expect("deal");
        let first = session.thread.clone().expect("thread");
        session.send("drop 1").expect("send").expect("drop");
        let second = session.thread.clone().expect("thread");
        assert_ne!(first, second);

        let reply = session.send("drop 99").expect("send").expect("reply");
        assert_eq!(reply, pinzu_bot::INVALID_NUMBER);
        assert_eq!(session.thread.as_deref(), Some(second.as_str()));

        session.send("check").expect("send").expect("verdict");
        assert_eq!(session.thread, None);
    }
}
