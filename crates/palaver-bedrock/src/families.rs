//! Per-family request and response shapes.
//!
//! Bedrock model ids carry the provider family in their name
//! (`anthropic.claude-…`, `meta.llama3-…`, `mistral.mistral-…`), so a family
//! is selected by case-sensitive substring match on the id. The
//! [`ModelRegistry`] checks families in registration order and uses its
//! fallback when none match.
//!
//! Only the fallback chat-completions family forwards the conversation
//! history. The named families send the current message alone.

use serde_json::{Value, json};

use palaver_core::models::turn::Turn;

use crate::chat::{self, ChatMessage, SamplingParams};
use crate::client::{ConverseReply, ReplyBlock};
use crate::error::BedrockError;

/// A request ready to hand to an [`InferenceClient`](crate::client::InferenceClient).
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRequest {
    Converse {
        messages: Vec<ChatMessage>,
        params: SamplingParams,
    },
    InvokeModel {
        body: Value,
    },
}

/// What came back from the call a [`ModelRequest`] described.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Converse(ConverseReply),
    InvokeModel(Value),
}

/// Request/response adaptation for one group of model ids.
pub trait ModelFamily: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether `model_id` belongs to this family.
    fn matches(&self, model_id: &str) -> bool;

    fn build_request(&self, user_message: &str, history: &[Turn]) -> ModelRequest;

    /// Pull the raw (untrimmed) reply text out of the model output.
    fn extract_reply(&self, output: ModelOutput) -> Result<String, BedrockError>;
}

// ── Claude (Converse API) ────────────────────────────────────────────────────

/// Anthropic Claude models through the Converse API.
#[derive(Debug, Default, Clone, Copy)]
pub struct Claude;

impl ModelFamily for Claude {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn matches(&self, model_id: &str) -> bool {
        model_id.contains("claude")
    }

    fn build_request(&self, user_message: &str, _history: &[Turn]) -> ModelRequest {
        ModelRequest::Converse {
            messages: vec![ChatMessage::user(user_message)],
            params: SamplingParams::without_top_p(),
        }
    }

    fn extract_reply(&self, output: ModelOutput) -> Result<String, BedrockError> {
        let ModelOutput::Converse(reply) = output else {
            return Err(unexpected_output(self.name()));
        };

        match reply.content.into_iter().next() {
            Some(ReplyBlock::Text(text)) => Ok(text),
            Some(ReplyBlock::NonText) => Err(BedrockError::ResponseParse(
                "first content block is not text".to_string(),
            )),
            None => Err(BedrockError::ResponseParse(
                "assistant message has no content blocks".to_string(),
            )),
        }
    }
}

// ── Llama 3 (InvokeModel, header-tag prompt) ─────────────────────────────────

/// Meta Llama 3 models, prompted with the header-tag chat template.
#[derive(Debug, Default, Clone, Copy)]
pub struct Llama3;

impl Llama3 {
    /// Render the single-user-turn prompt.
    pub fn prompt(user_message: &str) -> String {
        format!(
            "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n\n\
             {user_message}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n\n"
        )
    }
}

impl ModelFamily for Llama3 {
    fn name(&self) -> &'static str {
        "llama3"
    }

    fn matches(&self, model_id: &str) -> bool {
        model_id.contains("llama3") || model_id.contains("llama-3")
    }

    fn build_request(&self, user_message: &str, _history: &[Turn]) -> ModelRequest {
        let params = SamplingParams::standard();
        ModelRequest::InvokeModel {
            body: json!({
                "prompt": Self::prompt(user_message),
                "max_gen_len": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
        }
    }

    fn extract_reply(&self, output: ModelOutput) -> Result<String, BedrockError> {
        let body = invoke_body(self.name(), output)?;
        string_at(&body, "/generation")
    }
}

// ── Mistral (InvokeModel, instruction brackets) ──────────────────────────────

/// Mistral models, prompted with `[INST]` instruction brackets.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mistral;

impl Mistral {
    pub fn prompt(user_message: &str) -> String {
        format!("<s>[INST] {user_message} [/INST]")
    }
}

impl ModelFamily for Mistral {
    fn name(&self) -> &'static str {
        "mistral"
    }

    fn matches(&self, model_id: &str) -> bool {
        model_id.contains("mistral")
    }

    fn build_request(&self, user_message: &str, _history: &[Turn]) -> ModelRequest {
        let params = SamplingParams::standard();
        ModelRequest::InvokeModel {
            body: json!({
                "prompt": Self::prompt(user_message),
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
        }
    }

    fn extract_reply(&self, output: ModelOutput) -> Result<String, BedrockError> {
        let body = invoke_body(self.name(), output)?;
        string_at(&body, "/outputs/0/text")
    }
}

// ── Chat completions (InvokeModel, full history) ─────────────────────────────

/// OpenAI-style `messages` body. Used for every model id no other family
/// claims, e.g. Gemma, which has no distinct chat endpoint on Bedrock.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChatCompletions;

impl ModelFamily for ChatCompletions {
    fn name(&self) -> &'static str {
        "chat_completions"
    }

    fn matches(&self, _model_id: &str) -> bool {
        true
    }

    fn build_request(&self, user_message: &str, history: &[Turn]) -> ModelRequest {
        let params = SamplingParams::standard();
        ModelRequest::InvokeModel {
            body: json!({
                "messages": chat::build_messages(user_message, history),
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
        }
    }

    fn extract_reply(&self, output: ModelOutput) -> Result<String, BedrockError> {
        let body = invoke_body(self.name(), output)?;
        string_at(&body, "/choices/0/message/content")
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Ordered family lookup: first match wins, fallback last.
pub struct ModelRegistry {
    families: Vec<Box<dyn ModelFamily>>,
    fallback: Box<dyn ModelFamily>,
}

impl ModelRegistry {
    /// An empty registry that resolves everything to `fallback`.
    pub fn new(fallback: impl ModelFamily + 'static) -> Self {
        Self {
            families: Vec::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Append a family. Families registered earlier take precedence.
    pub fn register(mut self, family: impl ModelFamily + 'static) -> Self {
        self.families.push(Box::new(family));
        self
    }

    pub fn resolve(&self, model_id: &str) -> &dyn ModelFamily {
        let family = self
            .families
            .iter()
            .find(|f| f.matches(model_id))
            .unwrap_or(&self.fallback);
        &**family
    }
}

impl Default for ModelRegistry {
    /// Claude, then Llama 3, then Mistral, falling back to chat completions.
    fn default() -> Self {
        Self::new(ChatCompletions)
            .register(Claude)
            .register(Llama3)
            .register(Mistral)
    }
}

fn unexpected_output(family: &str) -> BedrockError {
    BedrockError::ResponseParse(format!("unexpected response kind for {family} request"))
}

fn invoke_body(family: &str, output: ModelOutput) -> Result<Value, BedrockError> {
    match output {
        ModelOutput::InvokeModel(body) => Ok(body),
        ModelOutput::Converse(_) => Err(unexpected_output(family)),
    }
}

fn string_at(body: &Value, pointer: &str) -> Result<String, BedrockError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            BedrockError::ResponseParse(format!("no string at `{pointer}` in response: {body}"))
        })
}
