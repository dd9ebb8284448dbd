//! Agent catalogue for callers choosing a recipient.

use crate::config::Config;
use crate::directory::{resolve_agents, COORDINATOR_AGENT};

/// List all agents that can send and receive messages.
///
/// The coordinator identity is grouped separately from project agents.
pub fn list_agents(config: &Config) -> String {
    let agents = resolve_agents(config);

    let mut core: Vec<_> = Vec::new();
    let mut project: Vec<_> = Vec::new();
    for identity in agents.values() {
        if identity.name == COORDINATOR_AGENT {
            core.push(identity);
        } else {
            project.push(identity);
        }
    }
    core.sort_by(|a, b| a.name.cmp(&b.name));
    project.sort_by(|a, b| a.name.cmp(&b.name));

    let mut output = format!("📚 Available Agents for Messaging\n{}\n", "=".repeat(60));

    if !core.is_empty() {
        output.push_str("\n🔧 Core Agents:\n");
        for identity in core {
            output.push_str(&format!("\n   📦 {}\n      {}\n", identity.name, identity.description));
        }
    }

    if !project.is_empty() {
        output.push_str("\n📁 Project Agents:\n");
        for identity in project {
            output.push_str(&format!("\n   📦 {}\n      {}\n", identity.name, identity.description));
        }
    }

    output.push_str("\n💡 Usage Tips:\n");
    output.push_str("   • Use consistent agent names across sessions\n");
    output.push_str("   • Check messages at session start: read_messages(agent_name=\"your-name\")\n");
    output.push_str(
        "   • Send updates to relevant agents: create_message(from_agent=\"your-name\", to_agent=\"target\", ...)\n",
    );

    output
}
