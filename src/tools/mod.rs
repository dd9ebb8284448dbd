//! The tool-call surface: four operations over the mailbox store.
//!
//! Each tool is a synchronous function of configuration plus a request
//! struct, returning a textual response. The only refusable operation
//! is `create_message` (unknown recipient); everything else degrades
//! to advisories or empty results.

pub mod clear;
pub mod list;
pub mod read;
pub mod send;

use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mailbox::Priority;

pub use clear::clear_messages;
pub use list::list_agents;
pub use read::read_messages;
pub use send::create_message;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessageRequest {
    /// Sender name. Not validated; unrecognized senders get an advisory.
    pub from_agent: String,
    /// Recipient name, validated against the agent directory.
    pub to_agent: String,
    /// Message body.
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    /// File paths the recipient should review.
    #[serde(default)]
    pub context_files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadMessagesRequest {
    /// Whose mailbox to read.
    pub agent_name: String,
    /// Mark the returned messages as read in the persisted mailbox.
    #[serde(default = "default_true")]
    pub mark_as_read: bool,
    /// Only show messages of this priority.
    #[serde(default)]
    pub priority_filter: Option<Priority>,
    /// Include already-read messages.
    #[serde(default)]
    pub include_read: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClearMessagesRequest {
    /// Whose mailbox to compact.
    pub agent_name: String,
    /// Archive read messages older than this many days.
    #[serde(default = "default_older_than_days")]
    pub older_than_days: i64,
}

fn default_true() -> bool {
    true
}

fn default_older_than_days() -> i64 {
    7
}

/// Tool names exposed over the RPC boundary.
pub const TOOL_NAMES: [&str; 4] = [
    "create_message",
    "read_messages",
    "clear_messages",
    "list_agents",
];

/// Dispatch a tool call by name with JSON arguments.
pub fn call(config: &Config, tool: &str, args: Value) -> Result<String> {
    match tool {
        "create_message" => create_message(config, serde_json::from_value(args)?),
        "read_messages" => read_messages(config, serde_json::from_value(args)?),
        "clear_messages" => clear_messages(config, serde_json::from_value(args)?),
        "list_agents" => Ok(list_agents(config)),
        _ => Err(Error::Other(format!("Unknown tool: {}", tool))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};
    use serde_json::json;
    use tempfile::TempDir;

    use super::testutil::{define_agent, mailbox_file_exists, test_config};
    use super::*;
    use crate::mailbox::{MailboxStore, Message};

    fn send(config: &Config, from: &str, to: &str, body: &str, priority: Priority) -> Result<String> {
        create_message(
            config,
            CreateMessageRequest {
                from_agent: from.to_string(),
                to_agent: to.to_string(),
                message: body.to_string(),
                priority,
                context_files: vec![],
            },
        )
    }

    fn read(config: &Config, agent: &str, mark_as_read: bool, include_read: bool) -> String {
        read_messages(
            config,
            ReadMessagesRequest {
                agent_name: agent.to_string(),
                mark_as_read,
                priority_filter: None,
                include_read,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_recipient_blocks_and_mutates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "test-writer", "Writes tests");

        let err = send(&config, "a", "test-runner", "hi", Priority::Medium).unwrap_err();
        match err {
            Error::UnknownRecipient { to, suggestions, known } => {
                assert_eq!(to, "test-runner");
                assert!(suggestions.contains(&"test-writer".to_string()));
                assert!(known.contains(&"test-writer".to_string()));
                assert!(known.contains(&"memory-manager".to_string()));
            }
            other => panic!("expected UnknownRecipient, got {:?}", other),
        }
        assert!(!mailbox_file_exists(&config, "test-runner"));
    }

    #[test]
    fn test_unknown_sender_is_non_blocking() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "coder", "Writes code");

        let response = send(&config, "ghost-agent", "coder", "hi", Priority::Medium).unwrap();
        assert!(response.contains("ghost-agent"));
        assert!(response.contains("not in agent list"));

        let store = MailboxStore::new(&config);
        assert_eq!(store.load("coder").len(), 1);
    }

    #[test]
    fn test_send_confirmation_truncates_preview() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "coder", "Writes code");

        let body = "x".repeat(300);
        let response = send(&config, "coder", "coder", &body, Priority::High).unwrap();
        assert!(response.contains(&"x".repeat(200)));
        assert!(!response.contains(&"x".repeat(201)));
        assert!(response.contains("..."));
        assert!(response.contains("priority: high"));
    }

    #[test]
    fn test_read_view_follows_priority_order() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "z", "Target agent");

        send(&config, "z", "z", "body-low", Priority::Low).unwrap();
        send(&config, "z", "z", "body-high", Priority::High).unwrap();
        send(&config, "z", "z", "body-medium", Priority::Medium).unwrap();

        let view = read(&config, "z", false, true);
        let high = view.find("body-high").unwrap();
        let medium = view.find("body-medium").unwrap();
        let low = view.find("body-low").unwrap();
        assert!(high < medium && medium < low);
    }

    #[test]
    fn test_read_promotes_state() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "x", "Target agent");

        send(&config, "x", "x", "urgent note", Priority::High).unwrap();

        let first = read(&config, "x", true, false);
        assert!(first.contains("urgent note"));

        let second = read(&config, "x", true, false);
        assert!(!second.contains("urgent note"));
        assert!(second.contains("No unread messages"));

        // Still present in the mailbox, just read
        let store = MailboxStore::new(&config);
        let messages = store.load("x");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].read);
    }

    #[test]
    fn test_priority_filter_narrows_view_without_touching_others() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "x", "Target agent");

        // Distinct senders: same-second sends from one sender share an id,
        // and read-marking matches by id.
        send(&config, "alice", "x", "important", Priority::High).unwrap();
        send(&config, "bob", "x", "routine", Priority::Medium).unwrap();

        let view = read_messages(
            &config,
            ReadMessagesRequest {
                agent_name: "x".to_string(),
                mark_as_read: true,
                priority_filter: Some(Priority::High),
                include_read: false,
            },
        )
        .unwrap();
        assert!(view.contains("important"));
        assert!(!view.contains("routine"));

        // The filtered-out message is untouched and still unread
        let remaining = read(&config, "x", false, false);
        assert!(remaining.contains("routine"));
        assert!(!remaining.contains("important"));
    }

    #[test]
    fn test_include_read_view_keeps_mailbox_order() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "x", "Target agent");

        // Unread-before-read outranks priority in the mailbox order;
        // the returned view must not regroup after promotion.
        let mut seen = Message::new("a", "x", "already-seen-high", Priority::High, vec![]);
        seen.read = true;
        let fresh = Message::new("b", "x", "fresh-low", Priority::Low, vec![]);

        let store = MailboxStore::new(&config);
        store.save("x", vec![seen, fresh]).unwrap();

        let view = read(&config, "x", true, true);
        let fresh_at = view.find("fresh-low").unwrap();
        let seen_at = view.find("already-seen-high").unwrap();
        assert!(fresh_at < seen_at);
    }

    #[test]
    fn test_read_unknown_agent_warns_but_proceeds() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "coder", "Writes code");

        let view = read(&config, "stranger", true, false);
        assert!(view.contains("not recognized"));
        assert!(view.contains("coder"));
        assert!(view.contains("No unread messages"));
    }

    #[test]
    fn test_archive_partition() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "x", "Target agent");

        let old_ts = (Local::now() - Duration::days(10))
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
        let fresh_ts = (Local::now() - Duration::days(1))
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();

        let mut m1 = Message::new("a", "x", "old and read", Priority::Medium, vec![]);
        m1.timestamp = old_ts.clone();
        m1.read = true;
        let mut m2 = Message::new("b", "x", "old but unread", Priority::Medium, vec![]);
        m2.timestamp = old_ts;
        let mut m3 = Message::new("c", "x", "fresh and read", Priority::Medium, vec![]);
        m3.timestamp = fresh_ts;
        m3.read = true;

        let store = MailboxStore::new(&config);
        store.save("x", vec![m1, m2, m3]).unwrap();

        let response = clear_messages(
            &config,
            ClearMessagesRequest {
                agent_name: "x".to_string(),
                older_than_days: 7,
            },
        )
        .unwrap();
        assert!(response.contains("Archived 1 message"));
        assert!(response.contains("2 messages remaining"));

        let remaining = store.load("x");
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|m| m.message != "old and read"));

        let batch_path = store.archive_path("x", Local::now().date_naive());
        let batch: Vec<Message> =
            serde_json::from_str(&std::fs::read_to_string(batch_path).unwrap()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].message, "old and read");
    }

    #[test]
    fn test_clear_empty_mailbox_is_normal() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let response = clear_messages(
            &config,
            ClearMessagesRequest {
                agent_name: "nobody".to_string(),
                older_than_days: 7,
            },
        )
        .unwrap();
        assert!(response.contains("No messages to archive"));
    }

    #[test]
    fn test_unparsable_timestamp_never_archived() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let mut msg = Message::new("a", "x", "mystery age", Priority::Medium, vec![]);
        msg.timestamp = "not-a-timestamp".to_string();
        msg.read = true;

        let store = MailboxStore::new(&config);
        store.save("x", vec![msg]).unwrap();

        let response = clear_messages(
            &config,
            ClearMessagesRequest {
                agent_name: "x".to_string(),
                older_than_days: 7,
            },
        )
        .unwrap();
        assert!(response.contains("Archived 0 messages"));
        assert_eq!(store.load("x").len(), 1);
    }

    #[test]
    fn test_list_agents_groups_coordinator() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "coder", "Writes code");

        let catalogue = list_agents(&config);
        let core = catalogue.find("Core Agents").unwrap();
        let project = catalogue.find("Project Agents").unwrap();
        let coordinator = catalogue.find("memory-manager").unwrap();
        let coder = catalogue.find("coder").unwrap();
        assert!(core < coordinator && coordinator < project && project < coder);
    }

    #[test]
    fn test_call_dispatch() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "coder", "Writes code");

        let response = call(
            &config,
            "create_message",
            json!({
                "from_agent": "coder",
                "to_agent": "coder",
                "message": "hello"
            }),
        )
        .unwrap();
        assert!(response.contains("Message from coder"));

        assert!(call(&config, "bogus_tool", json!({})).is_err());
    }
}
