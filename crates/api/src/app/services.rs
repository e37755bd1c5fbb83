use std::sync::Arc;

use hrgate_auth::TokenService;

use crate::accounts::AccountStore;

/// Services shared by all handlers. Read-only after startup apart from the
/// account directory's own locking.
#[derive(Debug)]
pub struct AppServices {
    pub tokens: Arc<TokenService>,
    pub accounts: Arc<AccountStore>,
    /// Issuer label embedded in otpauth URIs.
    pub totp_issuer: String,
}
