//! Message records and the mailbox ordering invariant.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Message priority levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// Sort rank: high before medium before low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse from the wire form used by requests and filters.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message addressed to exactly one agent's mailbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Id derived from creation time and a truncated sender name.
    /// Second granularity; same-second sends from one sender can
    /// collide (known weakness, no dedup or retry).
    pub id: String,
    /// Sender-declared name, not validated to exist.
    pub from: String,
    /// Recipient name, validated against the agent directory at send time.
    pub to: String,
    /// Creation time, ISO-8601.
    pub timestamp: String,
    #[serde(default)]
    pub priority: Priority,
    /// Message body, free text.
    pub message: String,
    /// File paths or pointers the recipient should inspect.
    #[serde(default)]
    pub context_files: Vec<String>,
    #[serde(default)]
    pub read: bool,
}

impl Message {
    /// Create a new unread message stamped with the current time.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        body: impl Into<String>,
        priority: Priority,
        context_files: Vec<String>,
    ) -> Self {
        let from = from.into();
        let now = Local::now();

        Self {
            id: generate_id(&from, now),
            from,
            to: to.into(),
            timestamp: now.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            priority,
            message: body.into(),
            context_files,
            read: false,
        }
    }

    /// Age of the message relative to `now`, in seconds.
    ///
    /// An unparsable timestamp counts as "now" so the message never
    /// ages out of the mailbox by mistake.
    pub fn age_seconds(&self, now: DateTime<Local>) -> i64 {
        match parse_timestamp(&self.timestamp) {
            Some(ts) => (now.naive_local() - ts).num_seconds(),
            None => 0,
        }
    }
}

fn generate_id(from: &str, now: DateTime<Local>) -> String {
    let sender: String = from.chars().take(8).collect();
    format!("msg-{}-{}", now.format("%Y%m%d-%H%M%S"), sender)
}

/// Parse an ISO-8601 timestamp as stored in message records.
pub fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    // Stored form first, then a few common ISO-8601 shapes.
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(ts)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Apply the mailbox ordering invariant in place: unread before read,
/// then priority (high, medium, low), then timestamp ascending.
///
/// Stable, so applying it twice yields the same order.
pub fn sort_messages(messages: &mut [Message]) {
    messages.sort_by(|a, b| {
        a.read
            .cmp(&b.read)
            .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
}
