use clap::Subcommand;

/// Serverless function commands, run in-process.
#[derive(Clone, Debug, Subcommand)]
pub enum JobCommands {
    /// Credit a completed session to matching time goals.
    AutoUpdateGoals { session: String },
    /// Detect rank changes and notify.
    LeaderboardChanges {
        #[arg(long)]
        group: Option<String>,
    },
    /// Remind users under the water goal.
    WaterReminder {
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
}
