use crate::{
    Access, BotError, BotIdentity, Command, Event, GameRecord, GameStore, HandRenderer,
    SessionChain,
};
use pinzu_core::{CheckOutcome, EventBus, GameConfig, GameError, GameState, RngState};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info};

pub const HELP: &str = "\
A one-suit mahjong puzzle played by mentioning me. I deal you 14 circle tiles; \
discard one at a time with \"drop\" until your hand is a pair plus four sets, \
then call \"check\". Reply to my latest message to keep playing.

start
  Deal a new hand.
drop NUM
  Discard the tile at position NUM and draw another.
check
  Declare the hand complete. Right or wrong, the game ends.
";

pub const INVALID_NUMBER: &str = "Invalid number";
pub const INVALID_REFERENCE: &str = "Invalid reference";
pub const NOT_OWNER: &str = "You are not game owner";
pub const NO_MORE_TILES: &str = "No more tiles";
pub const MISJUDGE: &str = "Misjudge, game over 😵";
pub const WIN_FIRST_TURN: &str = "Win, game over (天和) 😳";

/// Routes one inbound message to the game it refers to and builds the reply.
/// Holds no game state itself; everything crosses requests through the store.
pub struct CommandRouter {
    identity: BotIdentity,
    chain: SessionChain,
    renderer: Box<dyn HandRenderer>,
    config: GameConfig,
}

impl CommandRouter {
    pub fn new(
        identity: BotIdentity,
        store: Arc<dyn GameStore>,
        renderer: Box<dyn HandRenderer>,
        config: GameConfig,
    ) -> Self {
        Self {
            identity,
            chain: SessionChain::new(store),
            renderer,
            config,
        }
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    pub fn chain(&self) -> &SessionChain {
        &self.chain
    }

    pub fn handle_json(&self, body: &str) -> Result<Option<Event>, BotError> {
        let inbound = Event::from_json(body)?;
        self.handle(&inbound)
    }

    /// `Ok(None)` means the message carried no command for the bot.
    pub fn handle(&self, inbound: &Event) -> Result<Option<Event>, BotError> {
        let Some(command) = Command::parse(&inbound.content) else {
            debug!(id = %inbound.id, "no command in message");
            return Ok(None);
        };
        let reference = inbound.reference();
        info!(
            command = command.name(),
            actor = %inbound.pubkey,
            reference = ?reference,
            "handling command"
        );

        let mut events = EventBus::default();
        let reply = match command {
            Command::Help => Some(self.reply(inbound, HELP.to_string())),
            Command::Start if reference.is_some() => {
                debug!("start inside an existing thread ignored");
                None
            }
            Command::Start => Some(self.start(inbound, &mut events)?),
            Command::Drop(position) => {
                Some(self.drop_tile(inbound, reference, position, &mut events)?)
            }
            Command::Check => Some(self.check(inbound, reference, &mut events)?),
        };
        for event in events.drain() {
            debug!(?event, "game event");
        }
        Ok(reply)
    }

    fn start(&self, inbound: &Event, events: &mut EventBus) -> Result<Event, BotError> {
        let mut rng = self.rng_for(inbound);
        debug!(seed = rng.seed(), "dealing");
        let state = GameState::deal(&self.config, &mut rng, events);
        let content = self.renderer.render(&state.hand)?;
        let reply = self.reply(inbound, content);
        let record = GameRecord {
            id: reply.id.clone(),
            owner: inbound.pubkey.clone(),
            state,
            created_at: reply.created_at,
        };
        self.chain.open(&record)?;
        Ok(reply)
    }

    fn drop_tile(
        &self,
        inbound: &Event,
        reference: Option<&str>,
        position: usize,
        events: &mut EventBus,
    ) -> Result<Event, BotError> {
        let record = match self.authorize(inbound, reference)? {
            Ok(record) => record,
            Err(denial) => return Ok(denial),
        };

        let mut state = record.state.clone();
        let mut rng = self.rng_for(inbound);
        let discard = match state.drop_tile(position, &self.config, &mut rng, events) {
            Ok(discard) => discard,
            Err(GameError::InvalidSelector { .. }) => {
                return Ok(self.reply(inbound, INVALID_NUMBER.to_string()))
            }
            Err(GameError::PileExhausted) => {
                return Ok(self.reply(inbound, NO_MORE_TILES.to_string()))
            }
        };

        let mut content = self.renderer.render(&state.hand)?;
        if discard.pile_exhausted() {
            content.push('\n');
            content.push_str(NO_MORE_TILES);
        }
        let reply = self.reply(inbound, content);
        let previous_id = record.id.clone();
        let next = GameRecord { state, ..record }.rekeyed(reply.id.clone());
        self.chain.advance(&previous_id, &next)?;
        Ok(reply)
    }

    fn check(
        &self,
        inbound: &Event,
        reference: Option<&str>,
        events: &mut EventBus,
    ) -> Result<Event, BotError> {
        let record = match self.authorize(inbound, reference)? {
            Ok(record) => record,
            Err(denial) => return Ok(denial),
        };

        // Checking ends the game whatever the outcome.
        self.chain.close(&record.id)?;
        let outcome = record.state.check(events);
        let content = match outcome {
            CheckOutcome::Win { .. } if outcome.is_first_turn_win() => {
                WIN_FIRST_TURN.to_string()
            }
            CheckOutcome::Win { turn, .. } => format!("Win, game over (count: {turn}) 😆"),
            CheckOutcome::Misjudge { .. } => MISJUDGE.to_string(),
        };
        Ok(self.reply(inbound, content))
    }

    /// Outer error aborts the request; inner `Err` is a denial to send back.
    fn authorize(
        &self,
        inbound: &Event,
        reference: Option<&str>,
    ) -> Result<Result<GameRecord, Event>, BotError> {
        Ok(match self.chain.resolve(reference, &inbound.pubkey)? {
            Access::Granted(record) => Ok(record),
            Access::Unknown => Err(self.reply(inbound, INVALID_REFERENCE.to_string())),
            Access::Denied => Err(self.reply(inbound, NOT_OWNER.to_string())),
        })
    }

    fn reply(&self, inbound: &Event, content: String) -> Event {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Event::reply(inbound, &self.identity, content, now)
    }

    fn rng_for(&self, inbound: &Event) -> RngState {
        match self.config.seed {
            Some(seed) => RngState::from_seed(seed ^ fnv64(inbound.id.as_bytes())),
            None => RngState::from_entropy(),
        }
    }
}

fn fnv64(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
