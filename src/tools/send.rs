//! Message routing: validate, build, append, persist.

use crate::config::Config;
use crate::directory::{resolve_agents, similar_names};
use crate::error::{Error, Result};
use crate::mailbox::{MailboxStore, Message};

use super::CreateMessageRequest;

/// Body preview length in the send confirmation.
const PREVIEW_LEN: usize = 200;

/// Send a message to another agent's mailbox.
///
/// Refuses with [`Error::UnknownRecipient`] when the recipient is not
/// in the agent directory; no mailbox is touched in that case. An
/// unrecognized sender only adds an advisory to the confirmation.
pub fn create_message(config: &Config, req: CreateMessageRequest) -> Result<String> {
    let agents = resolve_agents(config);

    if !agents.contains_key(&req.to_agent) {
        let mut known: Vec<String> = agents.keys().cloned().collect();
        known.sort();
        let suggestions = similar_names(&req.to_agent, &agents);
        return Err(Error::UnknownRecipient {
            to: req.to_agent,
            suggestions,
            known,
        });
    }

    let sender_warning = if agents.contains_key(&req.from_agent) {
        String::new()
    } else {
        format!(
            "\n⚠️  Note: Sender '{}' not in agent list. Consider using a known agent name for better tracking.",
            req.from_agent
        )
    };

    let message = Message::new(
        req.from_agent.as_str(),
        req.to_agent.as_str(),
        req.message.as_str(),
        req.priority,
        req.context_files.clone(),
    );

    let store = MailboxStore::new(config);
    store.mutate(&req.to_agent, |mut messages| {
        messages.push(message);
        (messages, ())
    })?;

    tracing::info!(
        "Message {} -> {} (priority: {})",
        req.from_agent,
        req.to_agent,
        req.priority
    );

    let preview: String = req.message.chars().take(PREVIEW_LEN).collect();
    let ellipsis = if req.message.chars().count() > PREVIEW_LEN {
        "..."
    } else {
        ""
    };

    Ok(format!(
        "✉️ Message from {} → {} (priority: {}){}\n\nMessage preview:\n{}{}",
        req.from_agent, req.to_agent, req.priority, sender_warning, preview, ellipsis
    ))
}

/// Render the corrective guidance for an unknown-recipient failure.
pub fn unknown_recipient_text(to: &str, suggestions: &[String], known: &[String]) -> String {
    let mut text = format!("❌ Agent '{}' not found.\n", to);

    if !suggestions.is_empty() {
        text.push_str("\n💡 Did you mean one of these?\n");
        for name in suggestions.iter().take(3) {
            text.push_str(&format!("   • {}\n", name));
        }
    }

    text.push_str("\n📋 Available agents:\n");
    for name in known {
        text.push_str(&format!("   • {}\n", name));
    }

    text.push_str(
        "\n🔄 Please retry with: create_message(from_agent=\"...\", to_agent=\"<correct-agent-name>\", ...)",
    );
    text
}
