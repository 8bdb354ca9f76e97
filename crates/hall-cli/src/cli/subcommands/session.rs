use clap::Subcommand;

/// Study session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Start a timed session.
    Start {
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Stop the active session (or the given one).
    Stop { id: Option<String> },
    /// Cancel the active session (or the given one) without points.
    Cancel { id: Option<String> },
    /// Record a finished session after the fact.
    Log {
        #[arg(long)]
        minutes: i64,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the active session.
    Active,
    /// List recent sessions.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Minutes per day for the last N days.
    Daily {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}
