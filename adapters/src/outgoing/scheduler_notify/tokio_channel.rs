use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::warn;

use domain::events::SchedulerNotification;
use tempmod_application::{
    error::{AppError, AppResult},
    ports::outgoing::scheduler::SchedulerNotifierPort,
};

/// Hands notifications to an in-process scheduler over a bounded channel.
/// `try_send` never waits: a full or closed channel is reported and dropped.
pub struct TokioChannelSchedulerNotifier {
    tx: Sender<SchedulerNotification>,
}

impl TokioChannelSchedulerNotifier {
    pub fn new(tx: Sender<SchedulerNotification>) -> Self {
        Self { tx }
    }

    pub fn with_capacity(capacity: usize) -> (Self, Receiver<SchedulerNotification>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl SchedulerNotifierPort for TokioChannelSchedulerNotifier {
    fn notify(&self, notification: SchedulerNotification) -> AppResult<()> {
        self.tx.try_send(notification).map_err(|e| {
            let reason = match &e {
                TrySendError::Full(_) => "channel full",
                TrySendError::Closed(_) => "scheduler receiver dropped",
            };
            warn!("Failed to hand notification to scheduler: {}", reason);
            AppError::NotificationUndeliverable {
                message: reason.to_string(),
            }
        })
    }
}
