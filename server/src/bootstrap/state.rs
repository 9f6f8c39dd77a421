use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::Receiver;
use tracing::info;

use domain::events::SchedulerNotification;
use tempmod_adapters::outgoing::{
    clock::system_clock::SystemClock,
    memory_kv::dashmap_store::InMemoryKeyValueStore,
    redis_deadpool::kv_store_redis::RedisKeyValueStoreAdapter,
    scheduler_notify::{
        tokio_channel::TokioChannelSchedulerNotifier, webhook_reqwest::WebhookSchedulerNotifier,
    },
};
use tempmod_adapters::shared::app_state::AppState as AdaptersAppState;
use tempmod_application::error::AppError;
use tempmod_application::infrastructure_config::{Config, SchedulerBackend, StorageBackend};
use tempmod_application::ports::outgoing::{
    clock::ClockPort, kv_store::KeyValueStorePort, scheduler::SchedulerNotifierPort,
};
use tempmod_application::store::{ModerationStore, ModerationStoreDeps};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub moderation_store: ModerationStore,
}

/// Everything `main` needs after wiring: the shared state plus the receiving
/// end of the in-process scheduler channel, when that backend is selected.
pub struct Bootstrap {
    pub state: AppState,
    pub scheduler_rx: Option<Receiver<SchedulerNotification>>,
}

impl AppState {
    pub fn build(config: Config) -> Result<Bootstrap, AppError> {
        let config = Arc::new(config);

        let kv_store = Self::create_key_value_store(&config)?;
        let (notifier, scheduler_rx) = Self::create_scheduler_notifier(&config)?;
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

        let moderation_store = ModerationStore::new(ModerationStoreDeps {
            store: kv_store,
            notifier,
            clock,
            default_duration_ms: config.moderation.default_temp_duration_ms,
        });

        Ok(Bootstrap {
            state: Self {
                config,
                moderation_store,
            },
            scheduler_rx,
        })
    }

    fn create_key_value_store(config: &Config) -> Result<Arc<dyn KeyValueStorePort>, AppError> {
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory key-value store");
                Ok(Arc::new(InMemoryKeyValueStore::new()))
            }
            StorageBackend::Redis => {
                let redis_config = deadpool_redis::Config::from_url(config.redis.redis_url());
                let redis_pool = redis_config
                    .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                    .map_err(|e| AppError::ConfigError {
                        message: format!("Failed to create Redis pool: {}", e),
                    })?;

                info!("Using Redis key-value store at {}", config.redis.redacted_url());
                Ok(Arc::new(RedisKeyValueStoreAdapter::new(
                    redis_pool,
                    &config.storage.namespace,
                    &config.environment.env,
                    config.redis.connect_timeout_ms,
                )))
            }
        }
    }

    fn create_scheduler_notifier(
        config: &Config,
    ) -> Result<
        (
            Arc<dyn SchedulerNotifierPort>,
            Option<Receiver<SchedulerNotification>>,
        ),
        AppError,
    > {
        match config.scheduler.backend {
            SchedulerBackend::Channel => {
                let (notifier, rx) =
                    TokioChannelSchedulerNotifier::with_capacity(config.scheduler.channel_capacity);
                Ok((Arc::new(notifier), Some(rx)))
            }
            SchedulerBackend::Webhook => {
                let endpoint =
                    config
                        .scheduler
                        .webhook_url
                        .clone()
                        .ok_or_else(|| AppError::ConfigError {
                            message: "scheduler webhook_url is not set".to_string(),
                        })?;
                let runtime = Handle::try_current().map_err(|e| AppError::ConfigError {
                    message: format!("Webhook notifier requires a Tokio runtime: {e}"),
                })?;
                let notifier = WebhookSchedulerNotifier::new(
                    endpoint,
                    config.scheduler.webhook_timeout_ms,
                    runtime,
                )?;
                Ok((Arc::new(notifier), None))
            }
        }
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(Arc::clone(&self.config), self.moderation_store.clone())
    }
}
