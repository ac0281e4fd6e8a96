//! Simulation context for the Pong simulation
//!
//! Owns the game state and the only path to durable storage. Talks to the
//! decision context exclusively through a [`decision_worker::DecisionLink`].

pub mod config;
pub mod game_loop;
pub mod input;
pub mod store;

pub use config::*;
pub use game_loop::*;
pub use input::*;
pub use store::*;
