use clap::Subcommand;

/// Notification commands.
#[derive(Clone, Debug, Subcommand)]
pub enum NotificationCommands {
    /// List notifications.
    List {
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Mark one notification read.
    Read { id: String },
    /// Mark every notification read.
    ReadAll,
    /// Count unread notifications.
    Count,
}
