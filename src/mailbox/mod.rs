//! Mailbox persistence and message records.

pub mod lock;
pub mod message;
pub mod store;

pub use message::{sort_messages, Message, Priority};
pub use store::MailboxStore;
