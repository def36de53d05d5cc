//! Message-driven session layer: turns inbound protocol events into game
//! commands, keeps the identity chain in a keyed store, and builds replies.

mod chain;
mod command;
mod config;
mod error;
mod event;
mod identity;
mod render;
mod router;
mod store;

pub use chain::*;
pub use command::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use identity::*;
pub use render::*;
pub use router::*;
pub use store::*;
