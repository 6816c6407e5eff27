use serde::{Deserialize, Serialize};

pub const DEFAULT_TONE: &str = "professional";

/// Outbound payload for the generation endpoint.
///
/// Serializes as `{ "emailContent": ..., "tone": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub email_content: String,
    pub tone: String,
}

impl GenerationRequest {
    pub fn new(email_content: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            email_content: email_content.into(),
            tone: tone.into(),
        }
    }
}
