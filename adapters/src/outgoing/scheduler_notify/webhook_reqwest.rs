use std::time::Duration;

use reqwest::{Client, Response};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use domain::events::SchedulerNotification;
use tempmod_application::{
    error::{AppError, AppResult},
    ports::outgoing::scheduler::SchedulerNotifierPort,
};

/// Posts each notification as JSON to an external scheduler. The request runs
/// on a detached task; its outcome is only logged.
pub struct WebhookSchedulerNotifier {
    client: Client,
    endpoint: String,
    runtime: Handle,
}

impl WebhookSchedulerNotifier {
    pub fn new(endpoint: String, timeout_ms: u64, runtime: Handle) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build scheduler webhook client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            runtime,
        })
    }
}

impl SchedulerNotifierPort for WebhookSchedulerNotifier {
    fn notify(&self, notification: SchedulerNotification) -> AppResult<()> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        self.runtime.spawn(async move {
            let result = client
                .post(&endpoint)
                .json(&notification)
                .send()
                .await
                .and_then(Response::error_for_status);

            match result {
                Ok(response) => debug!(
                    identifier = %notification.identifier,
                    status = %response.status(),
                    "Scheduler webhook accepted notification"
                ),
                Err(e) => warn!(
                    identifier = %notification.identifier,
                    expires_at = notification.expires_at,
                    error = %e,
                    "Scheduler webhook failed"
                ),
            }
        });

        Ok(())
    }
}
