use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod system;
pub mod two_factor;

/// Router for every endpoint. Access control is applied by the auth
/// middleware layered on top in `app::build_app`.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/whoami", get(system::whoami))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/system/status", get(system::status))
        .route("/admin/ping", get(system::admin_ping))
        .route("/employee/ping", get(system::employee_ping))
        .nest("/employee/2fa", two_factor::router())
}
