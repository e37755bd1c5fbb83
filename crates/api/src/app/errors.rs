use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hrgate_auth::AuthError;

/// Map an auth failure to its HTTP response.
///
/// Token failures all collapse to the same 401 body so clients cannot tell
/// a bad signature from an expired or malformed token.
pub fn auth_error_to_response(err: &AuthError) -> axum::response::Response {
    let status = match err {
        AuthError::Malformed
        | AuthError::BadSignature
        | AuthError::Expired
        | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        AuthError::InvalidOtpCode | AuthError::OtpNotInitialized => StatusCode::BAD_REQUEST,
        AuthError::Encoding(msg) => {
            tracing::error!(error = %msg, "token encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    json_error(status, err.public_message())
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_message(message: &str) -> axum::response::Response {
    json_error(StatusCode::OK, message)
}
