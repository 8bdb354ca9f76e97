use chrono::Utc;
use hall_core::entities::Profile;
use hall_db::updates::profile::ProfileUpdateBuilder;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProfileCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ProfileListResponse {
    profiles: Vec<Profile>,
}

/// Handle `hall profile`.
pub async fn handle(
    action: &ProfileCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProfileCommands::Create { name, avatar_url } => {
            let profile = ctx
                .service
                .create_profile(name, avatar_url.as_deref())
                .await?;
            output(&profile, flags.format)
        }
        ProfileCommands::Show { id } => {
            let id = target_user(id.as_deref(), ctx)?;
            output(&ctx.service.get_profile(id).await?, flags.format)
        }
        ProfileCommands::List { limit } => {
            let profiles = ctx.service.list_profiles(ctx.limit(*limit, flags)).await?;
            output(&ProfileListResponse { profiles }, flags.format)
        }
        ProfileCommands::Update {
            name,
            avatar_url,
            clear_avatar,
        } => {
            let user_id = ctx.require_user()?;
            let mut builder = ProfileUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.display_name(name);
            }
            if let Some(url) = avatar_url {
                builder = builder.avatar_url(Some(url.clone()));
            } else if *clear_avatar {
                builder = builder.avatar_url(None);
            }
            let profile = ctx.service.update_profile(user_id, builder.build()).await?;
            output(&profile, flags.format)
        }
        ProfileCommands::Stats { id } => {
            let id = target_user(id.as_deref(), ctx)?;
            let stats = ctx
                .service
                .profile_stats(id, Utc::now().date_naive())
                .await?;
            output(&stats, flags.format)
        }
    }
}

/// An explicit profile ID, else the acting user.
fn target_user<'a>(explicit: Option<&'a str>, ctx: &'a AppContext) -> anyhow::Result<&'a str> {
    match explicit {
        Some(id) => Ok(id),
        None => ctx.require_user(),
    }
}
