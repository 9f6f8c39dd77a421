use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use domain::temp_entry::DEFAULT_TEMP_DURATION_MS;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub redis: RedisConfig,
    pub scheduler: SchedulerConfig,
    pub moderation: ModerationConfig,
    pub sweep: SweepConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "redis")]
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub namespace: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub redis_url: SecretString,
    pub connect_timeout_ms: u64,
}

impl Serialize for RedisConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RedisConfig", 2)?;
        state.serialize_field("redis_url", "[REDACTED]")?;
        state.serialize_field("connect_timeout_ms", &self.connect_timeout_ms)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for RedisConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RedisConfigHelper {
            redis_url: String,
            connect_timeout_ms: u64,
        }

        let helper = RedisConfigHelper::deserialize(deserializer)?;
        Ok(RedisConfig {
            redis_url: SecretString::from(helper.redis_url),
            connect_timeout_ms: helper.connect_timeout_ms,
        })
    }
}

impl RedisConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.redis_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn redis_url(&self) -> &str {
        self.redis_url.expose_secret()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerBackend {
    #[serde(rename = "channel")]
    Channel,
    #[serde(rename = "webhook")]
    Webhook,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub backend: SchedulerBackend,
    pub webhook_url: Option<String>,
    pub webhook_timeout_ms: u64,
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    pub default_temp_duration_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub run_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origin: None,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                namespace: "tempmod".to_string(),
            },
            redis: RedisConfig {
                redis_url: SecretString::from(DEFAULT_REDIS_URL),
                connect_timeout_ms: 1000,
            },
            scheduler: SchedulerConfig {
                backend: SchedulerBackend::Channel,
                webhook_url: None,
                webhook_timeout_ms: 5000,
                channel_capacity: 256,
            },
            moderation: ModerationConfig {
                default_temp_duration_ms: DEFAULT_TEMP_DURATION_MS,
            },
            sweep: SweepConfig {
                enabled: true,
                interval_secs: 60,
                run_on_startup: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.storage.namespace.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "storage namespace cannot be empty".to_string(),
            });
        }

        if self.storage.backend == StorageBackend::Redis {
            if self.redis.redis_url.expose_secret().is_empty() {
                return Err(AppError::ConfigError {
                    message: "redis_url cannot be empty when the redis backend is selected"
                        .to_string(),
                });
            }

            if self.redis.connect_timeout_ms == 0 {
                return Err(AppError::ConfigError {
                    message: "redis connect_timeout_ms must be greater than 0".to_string(),
                });
            }
        }

        match self.scheduler.backend {
            SchedulerBackend::Channel => {
                if self.scheduler.channel_capacity == 0 {
                    return Err(AppError::ConfigError {
                        message: "scheduler channel_capacity must be greater than 0".to_string(),
                    });
                }
            }
            SchedulerBackend::Webhook => {
                let Some(webhook_url) = self.scheduler.webhook_url.as_deref() else {
                    return Err(AppError::ConfigError {
                        message: "scheduler webhook_url is required for the webhook backend"
                            .to_string(),
                    });
                };

                if url::Url::parse(webhook_url).is_err() {
                    return Err(AppError::ConfigError {
                        message: format!("scheduler webhook_url '{webhook_url}' is not a valid URL"),
                    });
                }

                if self.scheduler.webhook_timeout_ms == 0 {
                    return Err(AppError::ConfigError {
                        message: "scheduler webhook_timeout_ms must be greater than 0".to_string(),
                    });
                }
            }
        }

        if self.moderation.default_temp_duration_ms <= 0 {
            return Err(AppError::ConfigError {
                message: "default_temp_duration_ms must be greater than 0".to_string(),
            });
        }

        if self.sweep.enabled && self.sweep.interval_secs == 0 {
            return Err(AppError::ConfigError {
                message: "sweep interval_secs must be greater than 0 when enabled".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
