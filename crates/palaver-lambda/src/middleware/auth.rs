use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use lambda_http::request::RequestContext;
use serde_json::Value;

use crate::error::ApiError;

/// Caller identity middleware.
///
/// API Gateway has already verified the caller's token by the time the
/// request reaches the function; this reads the `sub` claim its authorizer
/// attached to the request context and inserts [`AuthUser`] into request
/// extensions for handlers to use. Requests without one are rejected.
pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let sub = req
        .extensions()
        .get::<RequestContext>()
        .and_then(subject_claim)
        .ok_or_else(|| ApiError::Unauthorized("missing caller identity".to_string()))?;

    req.extensions_mut().insert(AuthUser { sub });

    Ok(next.run(req).await)
}

/// The `sub` claim from a REST API (Cognito user pool authorizer) or HTTP
/// API (JWT authorizer) request context.
pub fn subject_claim(context: &RequestContext) -> Option<String> {
    let sub = match context {
        RequestContext::ApiGatewayV1(ctx) => ctx
            .authorizer
            .fields
            .get("claims")
            .and_then(|claims| claims.get("sub"))
            .and_then(Value::as_str)
            .map(str::to_string),
        RequestContext::ApiGatewayV2(ctx) => ctx
            .authorizer
            .as_ref()
            .and_then(|a| a.jwt.as_ref())
            .and_then(|jwt| jwt.claims.get("sub"))
            .cloned(),
        _ => None,
    };

    sub.filter(|s| !s.is_empty())
}

/// Authenticated user extracted from authorizer claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
}
