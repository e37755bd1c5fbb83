use serde::{Deserialize, Serialize};

use hrgate_auth::Role;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// TOTP code; required only when the account has 2FA enabled.
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CodeRequest {
    pub code: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
    pub role: Role,
    /// Token expiry, Unix seconds.
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    pub name: Option<String>,
    pub role: Option<Role>,
}

impl MeResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            name: None,
            role: None,
        }
    }
}
