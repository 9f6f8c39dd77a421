use serde::Serialize;

use domain::{actor::ActorId, temp_entry::TempEntry};

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            data: None,
        }
    }

    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempEntryResponse {
    pub identifier: String,
    pub handle: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl TempEntryResponse {
    pub fn new(identifier: &ActorId, entry: TempEntry) -> Self {
        Self {
            identifier: identifier.to_string(),
            handle: entry.handle,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub evicted: usize,
}
