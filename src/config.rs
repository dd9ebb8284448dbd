//! Configuration loading for Courier.

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable overriding the messages root directory.
pub const MESSAGES_DIR_ENV: &str = "COURIER_MESSAGES_DIR";

/// Environment variable naming the project root for agent discovery.
pub const PROJECT_DIR_ENV: &str = "COURIER_PROJECT_DIR";

/// Default project-local messages directory.
const DEFAULT_MESSAGES_DIR: &str = ".courier/messages";

/// Project-local agent definition directory.
const AGENTS_SUBDIR: &str = ".courier/agents";

/// Archive subdirectory under the messages root.
pub const ARCHIVE_SUBDIR: &str = "archive";

/// Get the Courier home directory (~/.courier).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".courier"))
}

/// Runtime configuration: where mailboxes live and where agent
/// definitions are discovered.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for mailbox files; archive batches live in
    /// `archive/` beneath it.
    pub messages_dir: PathBuf,
    /// Candidate agent-definition directories, scanned in order.
    /// Later directories overwrite earlier ones on name collisions.
    pub agent_dirs: Vec<PathBuf>,
}

impl Config {
    /// Build configuration from the environment.
    ///
    /// Missing directories are normal; nothing is created or validated
    /// here. Operations that need the messages root create it lazily.
    pub fn from_env() -> Self {
        let messages_dir = env::var(MESSAGES_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MESSAGES_DIR));

        let mut agent_dirs = vec![PathBuf::from(AGENTS_SUBDIR)];

        if let Ok(project_dir) = env::var(PROJECT_DIR_ENV) {
            agent_dirs.push(PathBuf::from(project_dir).join(AGENTS_SUBDIR));
        }

        if let Ok(home) = get_home_dir() {
            agent_dirs.push(home.join("agents"));
        }

        Self {
            messages_dir,
            agent_dirs,
        }
    }

    /// Archive directory for retired message batches.
    pub fn archive_dir(&self) -> PathBuf {
        self.messages_dir.join(ARCHIVE_SUBDIR)
    }
}
