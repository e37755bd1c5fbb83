//! Error taxonomy for the authentication/authorization core.

use thiserror::Error;

/// Per-request authentication, authorization and second-factor failures.
///
/// These are expected outcomes of adversarial or sloppy input and are always
/// returned as values. Callers must not expose the difference between the
/// three token failures; use [`AuthError::public_message`] for anything that
/// leaves the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Structurally invalid token or claims (including issuer mismatch).
    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    /// No valid principal where one is required.
    #[error("authentication required")]
    Unauthenticated,

    /// Valid principal, insufficient role.
    #[error("forbidden")]
    Forbidden,

    #[error("invalid one-time code")]
    InvalidOtpCode,

    /// A second factor was confirmed before any secret was issued.
    #[error("two-factor authentication not initialized")]
    OtpNotInitialized,

    /// Token could not be produced (claim encoding or timestamp overflow).
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl AuthError {
    /// Message safe to show to a client.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Malformed | Self::BadSignature | Self::Expired => "invalid token",
            Self::Unauthenticated => "Authentication required",
            Self::Forbidden => "Forbidden",
            Self::InvalidOtpCode => "Invalid code",
            Self::OtpNotInitialized => "2FA not initialized",
            Self::Encoding(_) => "Internal error",
        }
    }
}

/// Startup configuration failures. These abort process startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("signing key must be at least {min} bytes, got {actual}")]
    WeakSigningKey { min: usize, actual: usize },

    #[error("token issuer must not be empty")]
    MissingIssuer,

    #[error("token lifetime must be positive")]
    InvalidTtl,

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_failures_share_one_public_message() {
        let msgs: Vec<_> = [AuthError::Malformed, AuthError::BadSignature, AuthError::Expired]
            .iter()
            .map(AuthError::public_message)
            .collect();
        assert!(msgs.windows(2).all(|w| w[0] == w[1]));
        assert_ne!(msgs[0], AuthError::Unauthenticated.public_message());
    }
}
