use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module, then
/// sync the replica so the next reader sees this command's writes.
pub async fn dispatch(command: Commands, ctx: AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let result = match command {
        Commands::Profile { action } => commands::profile::handle(&action, &ctx, flags).await,
        Commands::Group { action } => commands::group::handle(&action, &ctx, flags).await,
        Commands::Invite { action } => commands::invite::handle(&action, &ctx, flags).await,
        Commands::Subject { action } => commands::subject::handle(&action, &ctx, flags).await,
        Commands::Goal { action } => commands::goal::handle(&action, &ctx, flags).await,
        Commands::Session { action } => commands::session::handle(&action, &ctx, flags).await,
        Commands::Leaderboard(args) => commands::leaderboard::handle(&args, &ctx, flags).await,
        Commands::Points(args) => commands::points::handle(&args, &ctx, flags).await,
        Commands::Water { action } => commands::water::handle(&action, &ctx, flags).await,
        Commands::Notifications { action } => {
            commands::notification::handle(&action, &ctx, flags).await
        }
        Commands::Message { action } => commands::message::handle(&action, &ctx, flags).await,
        Commands::Activity { action } => commands::activity::handle(&action, &ctx, flags).await,
        Commands::File { action } => commands::file::handle(&action, &ctx, flags).await,
        Commands::Quiz(args) => commands::quiz::handle(&args, &ctx, flags).await,
        Commands::Jobs { action } => commands::jobs::handle(&action, &ctx, flags).await,
        Commands::Serve(args) => return commands::serve::handle(&args, ctx).await,
        Commands::Schema(args) => return commands::schema::handle(&args, flags),
    };
    result?;
    ctx.sync_replica().await
}
