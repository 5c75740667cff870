use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use palaver_bedrock::client::InferenceClient;
use palaver_bedrock::reply::reply;
use palaver_core::limits::CONTEXT_TURNS;
use palaver_core::models::chat_request::ChatRequest;
use palaver_storage::client::TurnStore;
use palaver_storage::turns;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `POST /chat`: answer one message and record the exchange.
///
/// The turn is only written after the model replied, so a failed call
/// leaves the table untouched.
pub async fn send_message<I, S>(
    State(state): State<AppState<I, S>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError>
where
    I: InferenceClient + 'static,
    S: TurnStore + 'static,
{
    let request = ChatRequest::from_slice(&body)?.validate(&state.default_model_id)?;

    let history = turns::fetch_recent(state.store.as_ref(), &user.sub, CONTEXT_TURNS).await?;

    let response = reply(
        state.inference.as_ref(),
        &state.registry,
        &request.model_id,
        &request.message,
        &history,
    )
    .await?;

    let written_at = turns::next_write_time(jiff::Timestamp::now(), history.last());
    turns::append(
        state.store.as_ref(),
        &user.sub,
        written_at,
        &request.message,
        &response,
    )
    .await?;

    Ok(Json(ChatResponse { response }))
}
