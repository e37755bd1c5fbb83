use std::sync::Arc;

use axum::{
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use hrgate_auth::{RequestAuthenticator, RoutePolicy};

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: RequestAuthenticator,
    pub policy: Arc<RoutePolicy>,
}

/// Authenticate (bearer token → principal or anonymous), then authorize the
/// request method and path against the route policy. On success the principal, if any,
/// is inserted into the request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let principal = {
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        state.authenticator.authenticate(header, Utc::now())
    };

    let decision = state
        .policy
        .decide(req.method().as_str(), req.uri().path(), principal.as_ref());
    if let Some(err) = decision.error {
        tracing::debug!(
            method = %req.method(),
            path = %req.uri().path(),
            matched = ?decision.matched_prefix,
            error = %err,
            "request denied"
        );
        return errors::auth_error_to_response(&err);
    }

    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}
