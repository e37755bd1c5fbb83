use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use hrgate_auth::Principal;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(serde_json::json!({
        "subject": principal.subject,
        "role": principal.role.as_str(),
    }))
}

pub async fn status() -> &'static str {
    "system ok"
}

pub async fn admin_ping(Extension(principal): Extension<Principal>) -> String {
    format!("admin ok ({})", principal.role)
}

pub async fn employee_ping(Extension(principal): Extension<Principal>) -> String {
    format!("employee ok ({})", principal.role)
}
