use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TempBlockAdded,
    TempMuteAdded,
}

/// One-way message telling the external scheduler that an entry now expires at
/// `expires_at`. Nothing is sent on removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerNotification {
    pub kind: NotificationKind,
    pub identifier: ActorId,
    pub expires_at: i64,
}
