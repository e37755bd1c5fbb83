//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared services (token service, account directory)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses
//! - `cors.rs`: browser cross-origin settings

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use hrgate_auth::{AuthConfig, ConfigError, RequestAuthenticator, TokenService};

use crate::accounts::AccountStore;
use crate::middleware;

pub mod cors;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every route, public ones included, passes through the auth middleware;
/// the route policy decides which paths admit anonymous callers. CORS sits
/// outside it, so browser preflights are answered before authentication.
pub fn build_app(
    config: AuthConfig,
    cors: &cors::CorsConfig,
    accounts: Arc<AccountStore>,
) -> Result<Router, ConfigError> {
    let tokens = Arc::new(TokenService::new(config.token)?);

    let auth_state = middleware::AuthState {
        authenticator: RequestAuthenticator::new(tokens.clone()),
        policy: Arc::new(config.routes),
    };

    let services = Arc::new(services::AppServices {
        tokens,
        accounts,
        totp_issuer: config.totp_issuer,
    });

    Ok(routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors.layer()),
        ))
}
