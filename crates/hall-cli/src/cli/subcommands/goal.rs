use clap::Subcommand;

/// Goal commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GoalCommands {
    /// Create a goal in a group.
    Create {
        group: String,
        title: String,
        /// exercises, pages or time.
        #[arg(long)]
        unit: String,
        #[arg(long)]
        target: i64,
        #[arg(long)]
        subject: Option<String>,
        /// YYYY-MM-DD.
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List a group's goals.
    List {
        group: String,
        /// active, completed or archived.
        #[arg(long)]
        status: Option<String>,
    },
    /// Show a goal.
    Show { id: String },
    /// Edit a goal.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        target: Option<i64>,
        /// YYYY-MM-DD.
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long, conflicts_with = "deadline")]
        clear_deadline: bool,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, conflicts_with = "subject")]
        clear_subject: bool,
    },
    /// Record progress and earn points.
    Progress { id: String, delta: i64 },
    /// Archive a goal.
    Archive { id: String },
    /// Mark a goal completed.
    Complete { id: String },
    /// Delete a goal.
    Delete { id: String },
}
