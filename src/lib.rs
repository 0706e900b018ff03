//! Async client for the Project Zomboid flavour of the [Source RCON protocol](https://developer.valvesoftware.com/wiki/Source_RCON_Protocol).
//!
//! ```no_run
//! use pzrcon::{Client, ClientConfig, Command};
//!
//! # async fn run() -> Result<(), pzrcon::RconError> {
//! let mut client = Client::new(ClientConfig::new("127.0.0.1", 16261, "secret"))?;
//! client.connect().await?;
//! let reply = client.send(Command::ServerMsg, "\"restart in 5 minutes\"").await?;
//! println!("{reply}");
//! client.disconnect().await;
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod packet;

pub use client::{Client, FixedSessionId, RandomSessionIds, SessionIds, SessionState};
pub use command::Command;
pub use config::ClientConfig;
pub use error::RconError;
pub use packet::{Packet, PacketType};
