//! Inbox reading: filtered views with read-state promotion.

use std::collections::HashSet;

use crate::config::Config;
use crate::directory::resolve_agents;
use crate::error::Result;
use crate::mailbox::{MailboxStore, Message, Priority};

use super::ReadMessagesRequest;

/// Read messages for an agent.
///
/// Filters narrow the returned view only; the underlying mailbox is
/// never reordered or shrunk by a read. With `mark_as_read`, exactly
/// the viewed messages are promoted to read in the persisted mailbox
/// before the view is returned.
pub fn read_messages(config: &Config, req: ReadMessagesRequest) -> Result<String> {
    let agents = resolve_agents(config);

    let warning = if agents.contains_key(&req.agent_name) {
        String::new()
    } else {
        let mut names: Vec<&String> = agents.keys().collect();
        names.sort();
        let mut text = format!("⚠️  Agent '{}' not recognized.\n", req.agent_name);
        text.push_str("\nℹ️  To maintain consistent identity:\n");
        text.push_str("   1. Use the same agent name when sending and reading messages\n");
        text.push_str("   2. Choose from these known agents:\n");
        for name in names {
            text.push_str(&format!(
                "      • {} - {}\n",
                name,
                truncate(&agents[name].description, 50)
            ));
        }
        text.push_str(&format!(
            "\nChecking messages anyway for '{}'...\n\n",
            req.agent_name
        ));
        text
    };

    let store = MailboxStore::new(config);

    let view: Vec<Message> = if req.mark_as_read {
        store.mutate(&req.agent_name, |mut messages| {
            let ids: HashSet<String> = messages
                .iter()
                .filter(|m| passes(m, &req))
                .map(|m| m.id.clone())
                .collect();
            for msg in messages.iter_mut() {
                if ids.contains(&msg.id) {
                    msg.read = true;
                }
            }
            // View keeps the mailbox's load-time order; promotion does
            // not regroup messages the caller is about to see.
            let view: Vec<Message> = messages
                .iter()
                .filter(|m| ids.contains(&m.id))
                .cloned()
                .collect();
            (messages, view)
        })?
    } else {
        store
            .load(&req.agent_name)
            .into_iter()
            .filter(|m| passes(m, &req))
            .collect()
    };

    if view.is_empty() {
        let qualifier = if req.include_read { "" } else { "unread " };
        let priority_note = match req.priority_filter {
            Some(p) => format!(" with priority {}", p),
            None => String::new(),
        };
        return Ok(format!(
            "{}📭 No {}messages{} for {}",
            warning, qualifier, priority_note, req.agent_name
        ));
    }

    let plural = if view.len() == 1 { "" } else { "s" };
    let mut output = format!(
        "📬 Messages for {} ({} message{})\n{}\n",
        req.agent_name,
        view.len(),
        plural,
        "=".repeat(60)
    );

    for msg in &view {
        output.push_str(&format_message(msg));
    }

    Ok(format!("{}{}", warning, output))
}

fn passes(msg: &Message, req: &ReadMessagesRequest) -> bool {
    if !req.include_read && msg.read {
        return false;
    }
    if let Some(filter) = req.priority_filter {
        if msg.priority != filter {
            return false;
        }
    }
    true
}

fn format_message(msg: &Message) -> String {
    let status = if msg.read { "✓" } else { "•" };
    let priority_marker = match msg.priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    };

    let mut block = format!("\n{} {} From: {}\n", status, priority_marker, msg.from);
    block.push_str(&format!("   Time: {}\n", msg.timestamp));
    block.push_str(&format!(
        "   Priority: {}\n",
        msg.priority.as_str().to_uppercase()
    ));

    if !msg.context_files.is_empty() {
        block.push_str(&format!("   Files: {}\n", msg.context_files.join(", ")));
    }

    block.push_str(&format!("\n   Message:\n   {}\n", "-".repeat(50)));
    for line in msg.message.lines() {
        block.push_str(&format!("   {}\n", line));
    }
    block.push_str(&format!("   {}\n", "-".repeat(50)));

    block
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}
