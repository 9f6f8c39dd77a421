use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tracing::info;

use domain::events::SchedulerNotification;

/// Drains the in-process scheduler channel. The real un-block/un-mute work
/// belongs to the external scheduler; this only records what it would be told.
pub fn spawn_notification_drain(mut rx: Receiver<SchedulerNotification>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut received = 0;
        while let Some(notification) = rx.recv().await {
            received += 1;
            info!(
                kind = ?notification.kind,
                identifier = %notification.identifier,
                expires_at = notification.expires_at,
                "Expiry handed to scheduler"
            );
        }
        info!(received, "Scheduler channel closed");
        received
    })
}
