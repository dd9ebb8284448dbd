//! Courier library root.

pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod mailbox;
pub mod server;
pub mod tools;

pub use cli::Commands;
pub use config::Config;
pub use directory::{resolve_agents, AgentIdentity};
pub use error::{Error, Result};
pub use mailbox::{MailboxStore, Message, Priority};
