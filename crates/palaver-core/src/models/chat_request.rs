use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A chat request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChatRequest {
    pub message: String,
    pub model_id: String,
}

impl ChatRequest {
    /// Parse a raw JSON body.
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Check the message is present and resolve the model id.
    ///
    /// A missing or blank `model` falls back to `default_model`. The message
    /// is kept exactly as submitted.
    pub fn validate(self, default_model: &str) -> Result<ValidChatRequest, CoreError> {
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| CoreError::MissingField("message".to_string()))?;

        let model_id = self
            .model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_model.to_string());

        Ok(ValidChatRequest { message, model_id })
    }
}
