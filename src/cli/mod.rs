//! CLI commands for Courier using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Error;
use crate::mailbox::Priority;
use crate::server;
use crate::tools::{
    self, send::unknown_recipient_text, ClearMessagesRequest, CreateMessageRequest,
    ReadMessagesRequest,
};

/// Courier - file-persisted message bus for coordinating AI coding agents.
#[derive(Parser)]
#[command(name = "courier")]
#[command(version = "0.1.0")]
#[command(about = "Courier - inter-agent messaging over plain files", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the stdio JSON-RPC tool server
    Serve,

    /// Send a message to another agent
    Send {
        /// Sender agent name
        #[arg(long)]
        from: String,

        /// Recipient agent name
        #[arg(long)]
        to: String,

        /// Message body
        message: String,

        /// Priority: high, medium, low
        #[arg(long, default_value = "medium")]
        priority: String,

        /// File paths the recipient should review (repeatable)
        #[arg(long = "context-file")]
        context_files: Vec<String>,
    },

    /// Read messages for an agent
    Read {
        /// Agent whose mailbox to read
        agent: String,

        /// Leave messages unread after viewing
        #[arg(long)]
        no_mark_read: bool,

        /// Only show messages of this priority
        #[arg(long)]
        priority: Option<String>,

        /// Include already-read messages
        #[arg(long)]
        include_read: bool,
    },

    /// Archive old read messages
    Clear {
        /// Agent whose mailbox to compact
        agent: String,

        /// Archive read messages older than this many days
        #[arg(long, default_value_t = 7)]
        older_than_days: i64,
    },

    /// List all agents available for messaging
    Agents,
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        let config = Config::from_env();

        match self.command {
            Command::Serve => server::run(config).await,

            Command::Send {
                from,
                to,
                message,
                priority,
                context_files,
            } => {
                let request = CreateMessageRequest {
                    from_agent: from,
                    to_agent: to,
                    message,
                    priority: parse_priority(&priority)?,
                    context_files,
                };
                print_outcome(tools::create_message(&config, request))
            }

            Command::Read {
                agent,
                no_mark_read,
                priority,
                include_read,
            } => {
                let priority_filter = match priority {
                    Some(p) => Some(parse_priority(&p)?),
                    None => None,
                };
                let request = ReadMessagesRequest {
                    agent_name: agent,
                    mark_as_read: !no_mark_read,
                    priority_filter,
                    include_read,
                };
                print_outcome(tools::read_messages(&config, request))
            }

            Command::Clear {
                agent,
                older_than_days,
            } => {
                let request = ClearMessagesRequest {
                    agent_name: agent,
                    older_than_days,
                };
                print_outcome(tools::clear_messages(&config, request))
            }

            Command::Agents => {
                println!("{}", tools::list_agents(&config));
                Ok(())
            }
        }
    }
}

/// Print a tool response, rendering a recipient-validation refusal as
/// guidance text rather than a process failure.
fn print_outcome(result: crate::error::Result<String>) -> Result<()> {
    match result {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(Error::UnknownRecipient {
            ref to,
            ref suggestions,
            ref known,
        }) => {
            println!("{}", unknown_recipient_text(to, suggestions, known));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn parse_priority(s: &str) -> Result<Priority> {
    Priority::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid priority '{}': expected high, medium, or low", s))
}
