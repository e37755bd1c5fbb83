//! Self-service TOTP enrollment for the signed-in account.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;

use hrgate_auth::Principal;

use crate::app::dto::CodeRequest;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/setup", get(setup))
        .route("/enable", post(enable))
        .route("/disable", post(disable))
}

fn account_missing() -> Response {
    errors::json_error(StatusCode::NOT_FOUND, "Account not found")
}

fn non_blank(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}

pub async fn setup(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> Response {
    let offer = services.accounts.with_account_mut(&principal.subject, |account| {
        account
            .two_factor
            .begin_setup(&services.totp_issuer, &principal.subject)
    });

    match offer {
        Some(offer) => {
            tracing::info!(subject = %principal.subject, "two-factor setup issued");
            Json(offer).into_response()
        }
        None => account_missing(),
    }
}

pub async fn enable(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CodeRequest>,
) -> Response {
    let Some(code) = non_blank(req.code.as_deref()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "code is required");
    };

    let now = Utc::now();
    let result = services
        .accounts
        .with_account_mut(&principal.subject, |account| account.two_factor.confirm(code, now));

    match result {
        Some(Ok(())) => {
            tracing::info!(subject = %principal.subject, "two-factor enabled");
            errors::json_message("2FA enabled")
        }
        Some(Err(err)) => errors::auth_error_to_response(&err),
        None => account_missing(),
    }
}

pub async fn disable(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    body: Option<Json<CodeRequest>>,
) -> Response {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let now = Utc::now();
    let result = services.accounts.with_account_mut(&principal.subject, |account| {
        account
            .two_factor
            .disable(non_blank(req.code.as_deref()), now)
    });

    match result {
        Some(Ok(())) => {
            tracing::info!(subject = %principal.subject, "two-factor disabled");
            errors::json_message("2FA disabled")
        }
        Some(Err(err)) => errors::auth_error_to_response(&err),
        None => account_missing(),
    }
}
