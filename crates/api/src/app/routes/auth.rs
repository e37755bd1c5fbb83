use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use hrgate_auth::{AuthError, Principal, Role};

use crate::app::dto::{LoginRequest, LoginResponse, MeResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::password;

enum LoginFailure {
    BadCredentials,
    CodeRequired,
    StepUp(AuthError),
}

impl IntoResponse for LoginFailure {
    fn into_response(self) -> Response {
        match self {
            // Unknown account and wrong password share one response.
            LoginFailure::BadCredentials => {
                errors::json_error(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
            LoginFailure::CodeRequired => {
                errors::json_error(StatusCode::UNAUTHORIZED, "Two-factor code required")
            }
            LoginFailure::StepUp(err) => errors::auth_error_to_response(&err),
        }
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let LoginRequest { email, password, code } = req;

    let Some(hash) = services.accounts.password_hash(&email) else {
        tracing::info!(email = %email, "login rejected");
        return LoginFailure::BadCredentials.into_response();
    };

    // Argon2 is CPU-bound; keep it off the async workers and outside the
    // account lock.
    let verified = tokio::task::spawn_blocking(move || password::verify_password(&hash, &password)).await;
    match verified {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(email = %email, "login rejected");
            return LoginFailure::BadCredentials.into_response();
        }
        Err(err) => {
            tracing::error!(error = %err, "password check task failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    }

    let now = Utc::now();

    // Re-read the account: it may have been removed or changed its 2FA state
    // while the hash was being checked.
    let checked = services
        .accounts
        .with_account(&email, |account| -> Result<(String, Role), LoginFailure> {
            if account.two_factor.is_enabled() {
                let code = code
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or(LoginFailure::CodeRequired)?;
                account
                    .two_factor
                    .verify_step_up(code, now)
                    .map_err(LoginFailure::StepUp)?;
            }
            Ok((account.full_name.clone(), account.role))
        })
        .unwrap_or(Err(LoginFailure::BadCredentials));

    let (name, role) = match checked {
        Ok(found) => found,
        Err(failure) => {
            tracing::info!(email = %email, "login rejected");
            return failure.into_response();
        }
    };

    match services.tokens.issue(&email, role, now) {
        Ok(issued) => {
            tracing::info!(email = %email, role = %role, "login succeeded");
            Json(LoginResponse {
                token: issued.token,
                name,
                role,
                expires_at: issued.claims.exp.timestamp(),
            })
            .into_response()
        }
        Err(err) => errors::auth_error_to_response(&err),
    }
}

/// Reports the live account behind the token. A token whose account no
/// longer exists is treated as anonymous.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<Principal>>,
) -> Json<MeResponse> {
    let Some(Extension(principal)) = principal else {
        return Json(MeResponse::anonymous());
    };

    let current = services
        .accounts
        .with_account(&principal.subject, |a| (a.full_name.clone(), a.role));

    match current {
        Some((name, role)) => Json(MeResponse {
            authenticated: true,
            name: Some(name),
            role: Some(role),
        }),
        None => Json(MeResponse::anonymous()),
    }
}
