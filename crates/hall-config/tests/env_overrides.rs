use figment::Jail;
use hall_config::{ConfigError, HallConfig};

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("STUDYHALL_SERVER__PORT", "9191");
        jail.set_env("STUDYHALL_GENERAL__USER_ID", "usr-from-env");
        jail.set_env("STUDYHALL_WATER__DAILY_GOAL_ML", "3000");

        let config = HallConfig::load().expect("config loads");
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.general.user_id, "usr-from-env");
        assert_eq!(config.water.daily_goal_ml, 3000);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".studyhall")?;
        jail.create_file(
            ".studyhall/config.toml",
            r#"
[server]
service_key = "from-toml"
"#,
        )?;
        jail.set_env("STUDYHALL_SERVER__SERVICE_KEY", "from-env");

        let config = HallConfig::load().expect("config loads");
        assert_eq!(config.server.service_key, "from-env");
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("STUDYHALL_WATER__DAILY_GOAL_ML", "-5");

        let err = HallConfig::load().expect_err("negative goal should fail validation");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}
