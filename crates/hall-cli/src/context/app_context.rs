use std::path::Path;

use anyhow::Context;
use hall_config::HallConfig;
use hall_db::service::HallService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: HallService,
    pub config: HallConfig,
    /// Acting profile from `--user` or `general.user_id`.
    pub user_id: Option<String>,
}

impl AppContext {
    /// Open the database (synced replica when configured) and resolve the acting user.
    pub async fn init(config: HallConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db_path = flags
            .db
            .clone()
            .unwrap_or_else(|| config.database.path.clone());
        ensure_parent_dir(&db_path)?;

        let service = if config.database.is_remote() {
            match HallService::new_synced(
                &db_path,
                &config.database.url,
                &config.database.auth_token,
            )
            .await
            {
                Ok(service) => service,
                Err(error) => {
                    tracing::warn!(
                        %error,
                        "failed to open synced replica; falling back to local database"
                    );
                    HallService::new_local(&db_path)
                        .await
                        .context("failed to open local database")?
                }
            }
        } else {
            HallService::new_local(&db_path)
                .await
                .context("failed to open local database")?
        }
        .with_water_goal(config.water.daily_goal_ml);

        let user_id = resolve_user(flags.user.as_deref(), &config.general.user_id);

        Ok(Self {
            service,
            config,
            user_id,
        })
    }

    /// The acting user, or an error explaining how to pick one.
    pub fn require_user(&self) -> anyhow::Result<&str> {
        self.user_id.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "no acting user. Pass --user <profile-id> or set general.user_id \
                 (create one with 'hall profile create <name>')"
            )
        })
    }

    /// Push and pull replica state. A no-op on a local database.
    pub async fn sync_replica(&self) -> anyhow::Result<()> {
        self.service.sync().await.context("replica sync failed")
    }

    /// Effective list limit: command flag, then `--limit`, then config.
    pub fn limit(&self, local: Option<u32>, flags: &GlobalFlags) -> u32 {
        crate::commands::shared::limit::effective_limit(
            local,
            flags.limit,
            self.config.general.default_limit,
        )
    }
}

fn resolve_user(flag: Option<&str>, configured: &str) -> Option<String> {
    flag.map(str::trim)
        .filter(|id| !id.is_empty())
        .or_else(|| Some(configured.trim()).filter(|id| !id.is_empty()))
        .map(str::to_string)
}

fn ensure_parent_dir(db_path: &str) -> anyhow::Result<()> {
    if db_path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags(db: Option<String>, user: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: false,
            verbose: false,
            user: user.map(str::to_string),
            db,
        }
    }

    #[test]
    fn user_flag_wins_over_config() {
        assert_eq!(
            resolve_user(Some("usr-flag"), "usr-config").as_deref(),
            Some("usr-flag")
        );
        assert_eq!(resolve_user(None, "usr-config").as_deref(), Some("usr-config"));
        assert_eq!(resolve_user(Some("  "), ""), None);
    }

    #[tokio::test]
    async fn init_creates_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("hall.db");
        let ctx = AppContext::init(
            HallConfig::default(),
            &flags(Some(path.to_string_lossy().into_owned()), None),
        )
        .await
        .unwrap();

        assert!(path.exists());
        assert!(ctx.require_user().is_err());
    }

    #[tokio::test]
    async fn local_context_syncs_as_noop() {
        let ctx = AppContext::init(
            HallConfig::default(),
            &flags(Some(":memory:".into()), Some("usr-1")),
        )
        .await
        .unwrap();
        assert!(!ctx.service.is_synced_replica());
        ctx.sync_replica().await.unwrap();
    }

    #[tokio::test]
    async fn limit_precedence_uses_config_default() {
        let ctx = AppContext::init(
            HallConfig::default(),
            &flags(Some(":memory:".into()), Some("usr-1")),
        )
        .await
        .unwrap();
        let global = GlobalFlags {
            limit: Some(3),
            ..flags(None, None)
        };

        assert_eq!(ctx.limit(None, &flags(None, None)), 20);
        assert_eq!(ctx.limit(None, &global), 3);
        assert_eq!(ctx.limit(Some(9), &global), 9);
        assert_eq!(ctx.require_user().unwrap(), "usr-1");
    }
}
