use clap::Subcommand;

/// Profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProfileCommands {
    /// Create a profile.
    Create {
        name: String,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Show a profile (defaults to the acting user).
    Show { id: Option<String> },
    /// List profiles.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update the acting user's profile.
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
        /// Remove the avatar.
        #[arg(long, conflicts_with = "avatar_url")]
        clear_avatar: bool,
    },
    /// Totals, streaks and achievements (defaults to the acting user).
    Stats { id: Option<String> },
}
