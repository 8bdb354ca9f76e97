use clap::Subcommand;

/// Water intake commands.
#[derive(Clone, Debug, Subcommand)]
pub enum WaterCommands {
    /// Log an amount in millilitres.
    Log { ml: i64 },
    /// Progress toward the daily goal.
    Today {
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// List entries for a day.
    List {
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an entry.
    Delete { id: String },
}
