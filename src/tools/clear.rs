//! Archival: retire read, aged-out messages into dated batches.

use chrono::Local;

use crate::config::Config;
use crate::directory::resolve_agents;
use crate::error::Result;
use crate::mailbox::lock::with_lock;
use crate::mailbox::MailboxStore;

use super::ClearMessagesRequest;

/// Archive read messages older than the threshold.
///
/// The mailbox is partitioned under its lock: qualifying messages are
/// merged into the day's archive batch before the mailbox is rewritten
/// with the remainder, so a message is never in both places.
pub fn clear_messages(config: &Config, req: ClearMessagesRequest) -> Result<String> {
    let agents = resolve_agents(config);

    let consistency_note = if agents.contains_key(&req.agent_name) {
        String::new()
    } else {
        format!(
            "⚠️  Note: '{}' not in known agents. Ensure you use consistent naming.\n\n",
            req.agent_name
        )
    };

    let store = MailboxStore::new(config);
    store.ensure_dirs()?;

    let now = Local::now();
    let cutoff_seconds = req.older_than_days * 24 * 60 * 60;

    let (archived, remaining) = with_lock(&store.mailbox_path(&req.agent_name), || {
        let messages = store.load(&req.agent_name);

        if messages.is_empty() {
            return Ok((0, 0));
        }

        let (to_archive, to_keep): (Vec<_>, Vec<_>) = messages
            .into_iter()
            .partition(|m| m.read && m.age_seconds(now) > cutoff_seconds);

        let archived = to_archive.len();
        let remaining = to_keep.len();

        if !to_archive.is_empty() {
            store.append_archive(&req.agent_name, now.date_naive(), to_archive)?;
        }

        store.save(&req.agent_name, to_keep)?;

        Ok((archived, remaining))
    })?;

    if archived == 0 && remaining == 0 {
        return Ok(format!(
            "{}📭 No messages to archive for {}",
            consistency_note, req.agent_name
        ));
    }

    tracing::info!(
        "Archived {} messages for {} ({} remaining)",
        archived,
        req.agent_name,
        remaining
    );

    let archived_plural = if archived == 1 { "" } else { "s" };
    let remaining_plural = if remaining == 1 { "" } else { "s" };
    Ok(format!(
        "{}🗄️ Archived {} message{} for {}\n📬 {} message{} remaining",
        consistency_note,
        archived,
        archived_plural,
        req.agent_name,
        remaining,
        remaining_plural
    ))
}
