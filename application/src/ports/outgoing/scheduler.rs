use crate::error::AppResult;
use domain::events::SchedulerNotification;
use std::sync::Arc;

/// Outbound, fire-and-forget channel to the expiry scheduler. Implementations
/// must return without waiting for the receiver.
pub trait SchedulerNotifierPort: Send + Sync {
    fn notify(&self, notification: SchedulerNotification) -> AppResult<()>;
}

pub type DynSchedulerNotifierPort = Arc<dyn SchedulerNotifierPort>;
