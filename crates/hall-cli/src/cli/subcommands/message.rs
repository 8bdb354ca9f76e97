use clap::Subcommand;

/// Group chat commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MessageCommands {
    /// Send a message to a group.
    Send { group: String, content: String },
    /// Recent messages, oldest first.
    List {
        group: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete one of your messages.
    Delete { id: String },
}
