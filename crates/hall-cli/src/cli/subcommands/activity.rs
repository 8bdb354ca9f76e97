use clap::Subcommand;

/// Photo post commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ActivityCommands {
    /// Post a photo to a group.
    Post {
        group: String,
        image_url: String,
        #[arg(long)]
        caption: Option<String>,
    },
    /// Recent posts in a group.
    List {
        group: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete one of your posts.
    Delete { id: String },
}
