//! palaver-lambda
//!
//! HTTP surface of the chat backend: an axum router served through
//! `lambda_http` behind API Gateway.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use palaver_bedrock::client::InferenceClient;
use palaver_storage::client::TurnStore;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the full application: routes, identity check, audit logging, CORS.
pub fn app<I, S>(state: AppState<I, S>) -> Router
where
    I: InferenceClient + 'static,
    S: TurnStore + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes that need the caller's `sub` claim.
    let protected = Router::new()
        .route("/chat", post(routes::chat::send_message::<I, S>))
        .route("/history", get(routes::history::list_history::<I, S>))
        .route_layer(axum_mw::from_fn(middleware::auth::require_identity));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
