//! Decision context for the Pong simulation
//!
//! The decision process runs on its own thread and talks to the simulation
//! only through JSON frames over a duplex channel. It never touches game
//! state or durable storage directly: boards come in, directives go out,
//! and storage reads/writes are proxied by the simulation.

pub mod channel;
pub mod process;
pub mod recorder;
pub mod worker;

pub use channel::*;
pub use process::*;
pub use recorder::*;
pub use worker::*;
