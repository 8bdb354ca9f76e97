use clap::Subcommand;

/// Shared file commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FileCommands {
    /// Register an uploaded file with a group.
    Add {
        group: String,
        name: String,
        url: String,
        #[arg(long, default_value_t = 0)]
        size: i64,
        #[arg(long)]
        mime_type: Option<String>,
    },
    /// List a group's files.
    List { group: String },
    /// Delete a file (uploader or owner).
    Delete { id: String },
}
