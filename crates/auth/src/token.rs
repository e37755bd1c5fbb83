//! Session token issuance and stateless verification.
//!
//! Tokens are compact HS256 JWTs. There is no server-side session state;
//! expiry is the only termination.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;

use crate::claims::validate_time_window;
use crate::{AuthError, ConfigError, Role, SessionClaims, TokenConfig};

/// A freshly issued token together with the claims it encodes.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Issues and verifies signed session tokens.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    /// Build from explicit configuration. Fails on a weak key, empty issuer
    /// or non-positive lifetime; callers should treat that as fatal.
    pub fn new(config: TokenConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let key = config.signing_key.expose_secret();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["sub", "iss", "iat", "exp"]);
        // Expiry is checked against the caller's clock in `verify`.
        validation.validate_exp = false;

        tracing::info!(issuer = %config.issuer, ttl_secs = config.ttl.num_seconds(), "token service initialized");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            issuer: config.issuer,
            ttl: config.ttl,
        })
    }

    /// Issue a token for `subject` with `role`, valid from `now` for the
    /// configured lifetime. Sub-second precision is dropped.
    pub fn issue(&self, subject: &str, role: Role, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let iat = now.trunc_subsecs(0);
        let exp = iat
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Encoding("expiry out of range".to_string()))?;

        let claims = SessionClaims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat,
            exp,
            role,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token and return its claims.
    ///
    /// Header algorithm and signature are checked before the claims are
    /// parsed; issuer, subject and the time window after.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        let claims = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            })?;

        if claims.sub.is_empty() {
            return Err(AuthError::Malformed);
        }

        validate_time_window(&claims, now)?;

        Ok(claims)
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}
