//! The inference seam and its Bedrock Runtime implementation.
//!
//! Bedrock exposes two call styles and the model families use both:
//!
//! - **Converse**: a structured, model-agnostic chat protocol. Messages go in
//!   as role-tagged content blocks and the reply comes back as an assistant
//!   message made of content blocks.
//! - **InvokeModel**: a raw JSON body in the provider's native format, with a
//!   raw JSON body back. Each provider shapes both differently.
//!
//! [`InferenceClient`] covers exactly these two calls so the adapter can be
//! driven by a scripted client in tests.

use std::future::Future;

use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use aws_smithy_types::Blob;
use tracing::debug;

use crate::chat::{ChatMessage, ChatRole, SamplingParams};
use crate::error::BedrockError;

/// Assistant message returned by a Converse call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConverseReply {
    pub content: Vec<ReplyBlock>,
}

/// One content block of a Converse reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBlock {
    Text(String),
    /// Tool use, images, reasoning and the like. The chat routes never ask
    /// for these.
    NonText,
}

/// Outbound calls to the inference service.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait InferenceClient: Send + Sync {
    /// Send a conversation through the Converse API.
    ///
    /// `System` messages become the request's system prompt; the rest are
    /// sent in order as conversation turns.
    fn converse(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> impl Future<Output = Result<ConverseReply, BedrockError>> + Send;

    /// Send a provider-native JSON body through InvokeModel and return the
    /// provider-native JSON response.
    fn invoke_model(
        &self,
        model_id: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, BedrockError>> + Send;
}

/// [`InferenceClient`] backed by the Bedrock Runtime SDK client.
#[derive(Clone, Debug)]
pub struct BedrockRuntime {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockRuntime {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self::from_client(aws_sdk_bedrockruntime::Client::new(config))
    }

    pub fn from_client(client: aws_sdk_bedrockruntime::Client) -> Self {
        Self { client }
    }
}

impl InferenceClient for BedrockRuntime {
    async fn converse(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<ConverseReply, BedrockError> {
        let mut request = self.client.converse().model_id(model_id);

        for msg in messages {
            let role = match msg.role {
                ChatRole::System => {
                    request = request.system(SystemContentBlock::Text(msg.content.clone()));
                    continue;
                }
                ChatRole::User => ConversationRole::User,
                ChatRole::Assistant => ConversationRole::Assistant,
            };
            let message = Message::builder()
                .role(role)
                .content(ContentBlock::Text(msg.content.clone()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))?;
            request = request.messages(message);
        }

        let mut inference = InferenceConfiguration::builder()
            .max_tokens(params.max_tokens as i32)
            .temperature(params.temperature as f32);
        if let Some(top_p) = params.top_p {
            inference = inference.top_p(top_p as f32);
        }

        let response = request
            .inference_config(inference.build())
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let content = output_message
            .content()
            .iter()
            .map(|block| match block {
                ContentBlock::Text(text) => ReplyBlock::Text(text.clone()),
                _ => ReplyBlock::NonText,
            })
            .collect();

        Ok(ConverseReply { content })
    }

    async fn invoke_model(
        &self,
        model_id: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, BedrockError> {
        let payload = serde_json::to_vec(body)?;
        debug!(model_id, bytes = payload.len(), "invoking model");

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(payload))
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        serde_json::from_slice(response.body().as_ref()).map_err(|e| {
            BedrockError::ResponseParse(format!("model {model_id} returned invalid JSON: {e}"))
        })
    }
}
