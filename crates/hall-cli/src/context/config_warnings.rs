use hall_config::HallConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &HallConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &HallConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    let sections = [
        ("database", config.database.is_remote(), "STUDYHALL_DATABASE__URL"),
        ("server", config.server.is_configured(), "STUDYHALL_SERVER__SERVICE_KEY"),
        ("quiz", config.quiz.is_configured(), "STUDYHALL_QUIZ__API_KEY"),
    ];
    for (section, configured, example) in sections {
        let prefix = format!("STUDYHALL_{}", section.to_ascii_uppercase());
        let nested = format!("{prefix}__");
        let mistyped = env_keys
            .iter()
            .any(|key| key.starts_with(&prefix) && !key.starts_with(&nested));
        if !configured && mistyped {
            warnings.push(format!(
                "{section} config appears default while {prefix}* env vars exist. \
                 Use double underscores (example: {example})."
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use hall_config::{HallConfig, QuizConfig};

    use super::collect_unconfigured_warnings;

    fn env(keys: &[&str]) -> Vec<(String, String)> {
        keys.iter()
            .map(|key| ((*key).to_string(), "value".to_string()))
            .collect()
    }

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &HallConfig::default(),
            env(&[
                "STUDYHALL_DATABASE_URL",
                "STUDYHALL_SERVER_SERVICE_KEY",
                "STUDYHALL_QUIZ_API_KEY",
            ]),
        );
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("STUDYHALL_DATABASE__URL"));
    }

    #[test]
    fn correctly_nested_keys_do_not_warn() {
        let warnings = collect_unconfigured_warnings(
            &HallConfig::default(),
            env(&["STUDYHALL_QUIZ__MODEL", "STUDYHALL_LOG"]),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn configured_sections_do_not_warn() {
        let config = HallConfig {
            quiz: QuizConfig {
                api_key: "sk".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let warnings = collect_unconfigured_warnings(&config, env(&["STUDYHALL_QUIZ_API_KEY"]));
        assert!(warnings.is_empty());
    }
}
