use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::error::{DomainError, DomainResult};
use crate::events::NotificationKind;

pub const DEFAULT_TEMP_DURATION_MS: i64 = 24 * 60 * 60 * 1000;

/// A time-bounded block or mute. Presence in a map does not mean the entry is
/// still in force; compare `expires_at` against the current instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempEntry {
    pub handle: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl TempEntry {
    pub fn new(handle: impl Into<String>, now_ms: i64, duration_ms: i64) -> DomainResult<Self> {
        if duration_ms <= 0 {
            return Err(DomainError::InvalidDuration(format!(
                "duration must be positive, got {duration_ms}ms"
            )));
        }

        let expires_at = now_ms.checked_add(duration_ms).ok_or_else(|| {
            DomainError::InvalidDuration(format!("duration {duration_ms}ms overflows expiry"))
        })?;

        Ok(Self {
            handle: handle.into(),
            created_at: now_ms,
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at <= now_ms
    }

    pub fn is_active_at(&self, now_ms: i64) -> bool {
        !self.is_expired_at(now_ms)
    }
}

pub type TempEntryMap = BTreeMap<ActorId, TempEntry>;

/// Drops every entry whose expiry is at or before `now_ms`, returning how many
/// were removed.
pub fn retain_unexpired(entries: &mut TempEntryMap, now_ms: i64) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_active_at(now_ms));
    before - entries.len()
}

/// Which of the two independent temp maps an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TempKind {
    Block,
    Mute,
}

impl TempKind {
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Block => "temp_blocks",
            Self::Mute => "temp_mutes",
        }
    }

    pub fn notification_kind(self) -> NotificationKind {
        match self {
            Self::Block => NotificationKind::TempBlockAdded,
            Self::Mute => NotificationKind::TempMuteAdded,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Mute => "mute",
        }
    }
}
