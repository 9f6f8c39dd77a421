use tempmod_application::infrastructure_config::{
    Config, SchedulerBackend, StorageBackend, SweepConfig,
};
use tracing::info;

pub fn print_startup_info(config: &Config) {
    info!("Configuration:");
    print_storage_configuration(config);
    print_scheduler_configuration(config);
    print_sweep_configuration(&config.sweep);
    info!(
        "  Default temp duration: {}ms",
        config.moderation.default_temp_duration_ms
    );
}

fn print_storage_configuration(config: &Config) {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("  Storage: in-memory (state is lost on restart)");
        }
        StorageBackend::Redis => {
            info!(
                "  Storage: Redis at {} (namespace '{}:{}')",
                config.redis.redacted_url(),
                config.storage.namespace,
                config.environment.env
            );
        }
    }
}

fn print_scheduler_configuration(config: &Config) {
    match config.scheduler.backend {
        SchedulerBackend::Channel => info!(
            "  Scheduler: in-process channel (capacity {})",
            config.scheduler.channel_capacity
        ),
        SchedulerBackend::Webhook => info!(
            "  Scheduler: webhook {} (timeout {}ms)",
            config.scheduler.webhook_url.as_deref().unwrap_or("<unset>"),
            config.scheduler.webhook_timeout_ms
        ),
    }
}

fn print_sweep_configuration(sweep: &SweepConfig) {
    if sweep.enabled {
        info!("  Expiry sweep: every {}s", sweep.interval_secs);
    } else {
        info!("  Expiry sweep: DISABLED");
    }
}
