use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::actor::ActorId;
use crate::error::{DomainError, DomainResult};

pub const MAX_HISTORY_ENTRIES: usize = 100;

/// A persisted moderation action. Beyond `id` the payload is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl HistoryEntry {
    pub fn action(&self) -> Option<&str> {
        self.payload.get("action").and_then(Value::as_str)
    }
}

/// An entry about to be appended; `id` is synthesized when absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewHistoryEntry {
    pub id: Option<String>,
    pub payload: Map<String, Value>,
}

impl NewHistoryEntry {
    pub fn from_payload(mut payload: Map<String, Value>) -> Self {
        let id = match payload.remove("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id),
            _ => None,
        };
        Self { id, payload }
    }

    pub fn from_json(value: Value) -> DomainResult<Self> {
        match value {
            Value::Object(payload) => Ok(Self::from_payload(payload)),
            other => Err(DomainError::InvalidHistoryEntry(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    pub fn for_action(
        action: ModerationAction,
        actor: &ActorId,
        handle: &str,
        timestamp_ms: i64,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert("action".to_string(), Value::from(action.as_str()));
        payload.insert("did".to_string(), Value::from(actor.as_str()));
        payload.insert("handle".to_string(), Value::from(handle));
        payload.insert("timestamp".to_string(), Value::from(timestamp_ms));
        Self { id: None, payload }
    }

    #[must_use]
    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.payload
            .insert("durationMs".to_string(), Value::from(duration_ms));
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn into_entry(self, fallback_id: impl FnOnce() -> String) -> HistoryEntry {
        HistoryEntry {
            id: self.id.unwrap_or_else(fallback_id),
            payload: self.payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Block,
    Mute,
    Unblock,
    Unmute,
    TempBlock,
    TempMute,
}

impl ModerationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Mute => "mute",
            Self::Unblock => "unblock",
            Self::Unmute => "unmute",
            Self::TempBlock => "temp_block",
            Self::TempMute => "temp_mute",
        }
    }
}
