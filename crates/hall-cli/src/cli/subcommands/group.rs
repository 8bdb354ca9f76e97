use clap::Subcommand;

/// Study group commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GroupCommands {
    /// Create a group owned by the acting user.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List the acting user's groups.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a group.
    Show { id: String },
    /// Rename or redescribe a group (owner or admin).
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a group (owner).
    Delete { id: String },
    /// Join a group by invite code.
    Join { code: String },
    /// Leave a group.
    Leave { id: String },
    /// List group members.
    Members { id: String },
    /// Change a member's role (owner).
    Role {
        id: String,
        user: String,
        /// admin or member.
        role: String,
    },
}
