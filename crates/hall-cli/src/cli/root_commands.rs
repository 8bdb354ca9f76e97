use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    ActivityCommands, FileCommands, GoalCommands, GroupCommands, InviteCommands, JobCommands,
    MessageCommands, NotificationCommands, ProfileCommands, SessionCommands, SubjectCommands,
    WaterCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Profiles and stats.
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Study groups and membership.
    Group {
        #[command(subcommand)]
        action: GroupCommands,
    },
    /// Group invitations.
    Invite {
        #[command(subcommand)]
        action: InviteCommands,
    },
    /// Subjects within a group.
    Subject {
        #[command(subcommand)]
        action: SubjectCommands,
    },
    /// Group goals.
    Goal {
        #[command(subcommand)]
        action: GoalCommands,
    },
    /// Timed study sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Ranked points, per group or global.
    Leaderboard(LeaderboardArgs),
    /// Points ledger for the acting user.
    Points(PointsArgs),
    /// Water intake tracking.
    Water {
        #[command(subcommand)]
        action: WaterCommands,
    },
    /// Notifications inbox.
    #[command(name = "notifications", alias = "notification")]
    Notifications {
        #[command(subcommand)]
        action: NotificationCommands,
    },
    /// Group chat.
    Message {
        #[command(subcommand)]
        action: MessageCommands,
    },
    /// Photo posts.
    Activity {
        #[command(subcommand)]
        action: ActivityCommands,
    },
    /// Shared file metadata.
    File {
        #[command(subcommand)]
        action: FileCommands,
    },
    /// Generate multiple-choice test questions.
    Quiz(QuizArgs),
    /// Run a serverless function locally.
    Jobs {
        #[command(subcommand)]
        action: JobCommands,
    },
    /// Serve the functions over HTTP.
    Serve(ServeArgs),
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `hall leaderboard`.
#[derive(Clone, Debug, Args)]
pub struct LeaderboardArgs {
    /// Group ID; omit for the global board.
    #[arg(long)]
    pub group: Option<String>,
    /// all_time, week or month.
    #[arg(long, default_value = "all_time")]
    pub period: String,
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `hall points`.
#[derive(Clone, Debug, Args)]
pub struct PointsArgs {
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `hall quiz`.
#[derive(Clone, Debug, Args)]
pub struct QuizArgs {
    pub subject: String,
    pub topic: String,
    #[arg(long, default_value_t = 5)]
    pub count: u8,
    /// easy, medium or hard.
    #[arg(long, default_value = "medium")]
    pub difficulty: String,
}

/// Arguments for `hall serve`.
#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Overrides server.host.
    #[arg(long)]
    pub host: Option<String>,
    /// Overrides server.port.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Arguments for `hall schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Registered type name (see `hall schema --list`).
    #[arg(required_unless_present = "list")]
    pub type_name: Option<String>,
    /// List registered type names.
    #[arg(long)]
    pub list: bool,
}
