use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddTempEntryRequest {
    #[validate(length(min = 1, max = 2048, message = "identifier must be 1-2048 characters"))]
    pub identifier: String,
    #[validate(length(min = 1, max = 253, message = "handle must be 1-253 characters"))]
    pub handle: String,
    #[validate(range(min = 1, message = "durationMs must be positive"))]
    pub duration_ms: Option<i64>,
}
