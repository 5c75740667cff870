//! Role-tagged conversation messages and the fixed sampling parameters.

use serde::{Deserialize, Serialize};

use palaver_core::models::turn::Turn;

/// Instruction placed at the head of every full conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

pub const MAX_OUTPUT_TOKENS: u32 = 512;
pub const TEMPERATURE: f64 = 0.7;
pub const TOP_P: f64 = 0.9;

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling settings sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f64,
    /// Nucleus sampling; `None` where the protocol variant does not take it.
    pub top_p: Option<f64>,
}

impl SamplingParams {
    /// Output cap, temperature and top-p.
    pub const fn standard() -> Self {
        Self {
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            top_p: Some(TOP_P),
        }
    }

    /// Output cap and temperature only.
    pub const fn without_top_p() -> Self {
        Self {
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            top_p: None,
        }
    }
}

/// Build the full conversation: system instruction, every history turn
/// (oldest first) as a user/assistant pair, then the current message.
pub fn build_messages(user_message: &str, history: &[Turn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));

    for turn in history {
        messages.push(ChatMessage::user(turn.user_message.clone()));
        messages.push(ChatMessage::assistant(turn.bot_response.clone()));
    }

    messages.push(ChatMessage::user(user_message));
    messages
}
