use std::error::Error;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use server::bootstrap::router::create_router;
use server::bootstrap::scheduler_bridge::spawn_notification_drain;
use server::bootstrap::state::AppState;
use server::bootstrap::sweeper::{spawn_sweeper, sweep_once};
use server::config_loader;
use server::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;

    observability::tracing::setup_logging(&config)?;

    info!("Starting temporary moderation store");
    observability::startup_info::print_startup_info(&config);

    let bootstrap = AppState::build(config.clone())?;
    let state = bootstrap.state;

    let drain = bootstrap.scheduler_rx.map(spawn_notification_drain);

    if config.sweep.run_on_startup {
        sweep_once(&state.moderation_store).await;
    }

    let sweeper = config.sweep.enabled.then(|| {
        spawn_sweeper(
            state.moderation_store.clone(),
            Duration::from_secs(config.sweep.interval_secs),
        )
    });

    let app = create_router(&state);

    let listener = TcpListener::bind(&config.server_address()).await?;
    info!("Server listening on http://{}", config.server_address());

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    if let Some(drain) = drain {
        drain.abort();
    }

    if let Err(e) = result {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown completed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown...");
        },
        () = terminate => {
            info!("Received terminate signal, starting graceful shutdown...");
        },
    }
}
