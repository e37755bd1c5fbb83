use crate::{Role, SessionClaims};

/// An authenticated caller, reconstructed from a verified session token.
///
/// Lives for one request only and is never persisted. The role is the one
/// baked into the token at issuance, so it may lag behind the account's live
/// role for at most one token lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Unique account identifier (the account's email address).
    pub subject: String,
    pub role: Role,
}

impl Principal {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }
}

impl From<SessionClaims> for Principal {
    fn from(claims: SessionClaims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}
