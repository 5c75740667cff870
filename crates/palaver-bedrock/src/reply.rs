use tracing::info;

use palaver_core::models::turn::Turn;

use crate::client::InferenceClient;
use crate::error::BedrockError;
use crate::families::{ModelOutput, ModelRegistry, ModelRequest};

/// Ask `model_id` to answer `user_message` and return the trimmed reply.
///
/// The family is resolved from `registry`; it decides which call style is
/// used and how much of `history` (oldest first) is sent. Exactly one call
/// goes out and a failure is returned as is, without retrying.
pub async fn reply<C: InferenceClient>(
    client: &C,
    registry: &ModelRegistry,
    model_id: &str,
    user_message: &str,
    history: &[Turn],
) -> Result<String, BedrockError> {
    let family = registry.resolve(model_id);
    info!(
        model_id,
        family = family.name(),
        history_len = history.len(),
        "requesting model reply"
    );

    let output = match family.build_request(user_message, history) {
        ModelRequest::Converse { messages, params } => {
            ModelOutput::Converse(client.converse(model_id, &messages, &params).await?)
        }
        ModelRequest::InvokeModel { body } => {
            ModelOutput::InvokeModel(client.invoke_model(model_id, &body).await?)
        }
    };

    let text = family.extract_reply(output)?;
    let text = text.trim().to_string();

    info!(model_id, reply_len = text.len(), "model reply received");

    Ok(text)
}
