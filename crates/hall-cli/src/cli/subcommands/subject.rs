use clap::Subcommand;

/// Subject commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SubjectCommands {
    /// Create a subject in a group.
    Create {
        group: String,
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// List a group's subjects.
    List { group: String },
    /// Delete a subject (owner or admin).
    Delete { id: String },
}
