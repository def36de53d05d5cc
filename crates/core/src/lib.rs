//! Core game logic for single-suit hand completion. Keep this crate free of IO.

pub mod agari;
pub mod config;
pub mod events;
pub mod pile;
pub mod rng;
pub mod state;
pub mod tile;

pub use agari::*;
pub use config::*;
pub use events::*;
pub use pile::*;
pub use rng::*;
pub use state::*;
pub use tile::*;
