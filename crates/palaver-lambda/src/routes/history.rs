use axum::Extension;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use palaver_core::limits::parse_history_limit;
use palaver_core::models::turn::HistoryEntry;
use palaver_storage::client::TurnStore;
use palaver_storage::turns;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Parsed by `parse_history_limit`, not serde.
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

/// `GET /history?limit=N`: the caller's most recent turns, oldest first.
pub async fn list_history<I, S>(
    State(state): State<AppState<I, S>>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError>
where
    I: Send + Sync + 'static,
    S: TurnStore + 'static,
{
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let limit = parse_history_limit(params.limit.as_deref())?;
    let history = turns::list_history(state.store.as_ref(), &user.sub, Some(limit)).await?;
    Ok(Json(HistoryResponse { history }))
}
