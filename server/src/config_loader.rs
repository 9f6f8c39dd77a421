use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::fs;
use std::path::Path;
use tempmod_application::error::{AppError, AppResult};
use tempmod_application::infrastructure_config::{Config, DEFAULT_REDIS_URL};
use tracing::info;

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;
    load_config_from(Figment::new())
}

/// Layers defaults, optional config files and `TEMPMOD_` env vars on top of
/// `base`.
pub fn load_config_from(base: Figment) -> AppResult<Config> {
    let default_config = Config::default();
    let mut figment = base
        .merge(Serialized::defaults(default_config))
        // The serialized defaults redact the URL, so restore the real default.
        .merge(Serialized::default("redis.redis_url", DEFAULT_REDIS_URL));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    let config: Config = figment
        .merge(Env::prefixed("TEMPMOD_").split("__"))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Please configure your secrets!");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempmod_application::infrastructure_config::{SchedulerBackend, StorageBackend};

    use super::*;

    #[test]
    fn env_overrides_nested_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TEMPMOD_SERVER__PORT", "4100");
            jail.set_env("TEMPMOD_STORAGE__BACKEND", "redis");
            jail.set_env("TEMPMOD_MODERATION__DEFAULT_TEMP_DURATION_MS", "60000");

            let config = load_config_from(Figment::new()).unwrap();
            assert_eq!(config.server.port, 4100);
            assert_eq!(config.storage.backend, StorageBackend::Redis);
            assert_eq!(config.moderation.default_temp_duration_ms, 60_000);
            assert_eq!(config.redis.redis_url(), DEFAULT_REDIS_URL);
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_layered_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [scheduler]
                backend = "webhook"
                webhook_url = "http://scheduler.internal/expiry"
                "#,
            )?;

            let config = load_config_from(Figment::new()).unwrap();
            assert_eq!(config.scheduler.backend, SchedulerBackend::Webhook);
            assert_eq!(
                config.scheduler.webhook_url.as_deref(),
                Some("http://scheduler.internal/expiry")
            );
            assert_eq!(config.scheduler.webhook_timeout_ms, 5000);
            Ok(())
        });
    }

    #[test]
    fn invalid_values_fail_validation() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TEMPMOD_SWEEP__INTERVAL_SECS", "0");
            assert!(matches!(
                load_config_from(Figment::new()),
                Err(AppError::ConfigError { .. })
            ));
            Ok(())
        });
    }
}
