//! Mailbox store: one JSON file per agent plus a dated archive area.
//!
//! `load` treats a missing or corrupt file as an empty mailbox; `save`
//! is a full-file overwrite of the sorted sequence. These are the only
//! persistence primitives.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::Result;

use super::lock::with_lock;
use super::message::{sort_messages, Message};

/// Store for per-agent mailbox files.
#[derive(Debug, Clone)]
pub struct MailboxStore {
    base_path: PathBuf,
    archive_dir: PathBuf,
}

impl MailboxStore {
    /// Create a store rooted at the configured messages directory.
    pub fn new(config: &Config) -> Self {
        Self {
            base_path: config.messages_dir.clone(),
            archive_dir: config.archive_dir(),
        }
    }

    /// Path of an agent's mailbox file.
    pub fn mailbox_path(&self, agent: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", agent))
    }

    /// Path of an agent's archive batch for a given day.
    pub fn archive_path(&self, agent: &str, day: NaiveDate) -> PathBuf {
        self.archive_dir
            .join(format!("{}-{}.json", agent, day.format("%Y%m%d")))
    }

    /// Ensure the mailbox and archive directories exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.archive_dir)?;
        Ok(())
    }

    /// Load an agent's mailbox.
    ///
    /// A nonexistent or unparsable file is an empty mailbox, never an
    /// error.
    pub fn load(&self, agent: &str) -> Vec<Message> {
        read_message_file(&self.mailbox_path(agent))
    }

    /// Save an agent's mailbox, applying the ordering invariant.
    ///
    /// Full-file overwrite of the complete sequence.
    pub fn save(&self, agent: &str, mut messages: Vec<Message>) -> Result<()> {
        self.ensure_dirs()?;
        sort_messages(&mut messages);
        let json = serde_json::to_string_pretty(&messages)?;
        fs::write(self.mailbox_path(agent), json)?;
        Ok(())
    }

    /// Run a load-transform-save sequence under the mailbox lock.
    ///
    /// The transform returns the new mailbox contents and a result value
    /// passed back to the caller.
    pub fn mutate<T, F>(&self, agent: &str, f: F) -> Result<T>
    where
        F: FnOnce(Vec<Message>) -> (Vec<Message>, T),
    {
        self.ensure_dirs()?;
        let path = self.mailbox_path(agent);
        with_lock(&path, || {
            let messages = read_message_file(&path);
            let (updated, value) = f(messages);
            self.save(agent, updated)?;
            Ok(value)
        })
    }

    /// Merge messages into the day's archive batch for an agent.
    ///
    /// Reads any existing batch first and extends it; runs under the
    /// batch file's lock so concurrent archivers serialize.
    pub fn append_archive(
        &self,
        agent: &str,
        day: NaiveDate,
        messages: Vec<Message>,
    ) -> Result<()> {
        self.ensure_dirs()?;
        let path = self.archive_path(agent, day);
        with_lock(&path, || {
            let mut batch = read_message_file(&path);
            batch.extend(messages);
            let json = serde_json::to_string_pretty(&batch)?;
            fs::write(&path, json)?;
            Ok(())
        })
    }
}

fn read_message_file(path: &Path) -> Vec<Message> {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Unparsable message file {}: {}", path.display(), e);
            Vec::new()
        }),
        Err(_) => Vec::new(),
    }
}
