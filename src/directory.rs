//! Agent directory resolution.
//!
//! Agents are declared by markdown definition files beginning with a
//! frontmatter block (`---` delimited) containing at least a `name`
//! field. The resolver re-scans the candidate directories on every
//! call; the definition files are the source of truth and can change
//! between scans.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::config::Config;

/// Well-known coordinator agent, always present in the directory.
pub const COORDINATOR_AGENT: &str = "memory-manager";

const COORDINATOR_DESCRIPTION: &str = "Lightweight memory coordinator for agent sessions";

const DEFAULT_DESCRIPTION: &str = "No description available";

/// An agent identity resolved from a definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    /// Agent name from frontmatter (primary key, may differ from filename).
    pub name: String,
    /// Description from frontmatter, or a placeholder.
    pub description: String,
    /// Filename stem of the defining document.
    pub source_file: String,
}

/// Parse an agent definition document into an identity.
///
/// Returns `None` unless the document starts with a `---` frontmatter
/// block that contains a `name` field.
pub fn parse_agent_file(path: &Path) -> Option<AgentIdentity> {
    let content = fs::read_to_string(path).ok()?;

    if !content.starts_with("---") {
        return None;
    }

    let mut lines = content.lines();
    lines.next(); // opening ---

    let field_re = Regex::new(r"^(name|description):\s*(.*)$").ok()?;

    let mut name = None;
    let mut description = None;
    let mut closed = false;

    for line in lines {
        if line.trim() == "---" {
            closed = true;
            break;
        }
        if let Some(caps) = field_re.captures(line) {
            let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            match caps.get(1).map(|m| m.as_str()) {
                Some("name") => name = Some(value.to_string()),
                Some("description") => description = Some(value.to_string()),
                _ => {}
            }
        }
    }

    if !closed {
        return None;
    }

    let name = name.filter(|n| !n.is_empty())?;

    Some(AgentIdentity {
        name,
        description: description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        source_file: path.file_stem()?.to_string_lossy().to_string(),
    })
}

/// Whether a definition file should be skipped entirely.
///
/// Files with a reserved `_` prefix or "example" in the stem are
/// templates, never valid agents.
fn is_reserved(stem: &str) -> bool {
    stem.starts_with('_') || stem.to_lowercase().contains("example")
}

/// Resolve all available agents from the configured candidate directories.
///
/// Directories are scanned non-recursively and in order; a name defined
/// in a later directory replaces the whole identity from an earlier one.
/// Missing directories are skipped silently. The coordinator identity is
/// guaranteed present even when no document defines it.
pub fn resolve_agents(config: &Config) -> HashMap<String, AgentIdentity> {
    let mut agents = HashMap::new();

    for dir in &config.agent_dirs {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem,
                None => continue,
            };
            if is_reserved(stem) {
                continue;
            }

            if let Some(identity) = parse_agent_file(&path) {
                tracing::debug!(
                    "Resolved agent '{}' from {}",
                    identity.name,
                    path.display()
                );
                agents.insert(identity.name.clone(), identity);
            }
        }
    }

    agents
        .entry(COORDINATOR_AGENT.to_string())
        .or_insert_with(|| AgentIdentity {
            name: COORDINATOR_AGENT.to_string(),
            description: COORDINATOR_DESCRIPTION.to_string(),
            source_file: COORDINATOR_AGENT.to_string(),
        });

    agents
}

/// Best-effort suggestions for a name that failed validation.
///
/// Lowercase substring containment in either direction, plus overlap on
/// `-` separated tokens. A UX aid for self-correction, not part of the
/// validation contract.
pub fn similar_names(target: &str, known: &HashMap<String, AgentIdentity>) -> Vec<String> {
    let target_lower = target.to_lowercase();
    let tokens: Vec<&str> = target_lower.split('-').filter(|t| !t.is_empty()).collect();

    let mut similar: Vec<String> = known
        .keys()
        .filter(|name| {
            let name_lower = name.to_lowercase();
            name_lower.contains(&target_lower)
                || target_lower.contains(&name_lower)
                || tokens.iter().any(|t| name_lower.contains(t))
        })
        .cloned()
        .collect();

    similar.sort();
    similar
}
