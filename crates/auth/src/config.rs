//! Authentication configuration.
//!
//! Everything here is loaded once at startup and passed explicitly to the
//! services that need it. Nothing reads ambient/global state per request.

use chrono::Duration;
use secrecy::{ExposeSecret, SecretVec};

use crate::{ConfigError, RoutePolicy};

/// Minimum HS256 key length (256 bits).
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

pub const DEFAULT_ISSUER: &str = "hr-backend";
pub const DEFAULT_TTL_MINUTES: i64 = 15;
pub const DEFAULT_TOTP_ISSUER: &str = "HR Backend";

/// Session token settings.
pub struct TokenConfig {
    /// Pre-shared symmetric key for HMAC-SHA256 signing.
    pub signing_key: SecretVec<u8>,
    /// Value of the `iss` claim; verification requires an exact match.
    pub issuer: String,
    /// Token lifetime. Also bounds how long a stale role claim can live.
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(signing_key: impl Into<Vec<u8>>, issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            signing_key: SecretVec::new(signing_key.into()),
            issuer: issuer.into(),
            ttl,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let key_len = self.signing_key.expose_secret().len();
        if key_len < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::WeakSigningKey {
                min: MIN_SIGNING_KEY_BYTES,
                actual: key_len,
            });
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::MissingIssuer);
        }
        if self.ttl <= Duration::zero() {
            return Err(ConfigError::InvalidTtl);
        }
        Ok(())
    }
}

impl core::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("signing_key", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

/// Process-wide auth settings.
#[derive(Debug)]
pub struct AuthConfig {
    pub token: TokenConfig,
    /// Issuer label shown in authenticator apps.
    pub totp_issuer: String,
    pub routes: RoutePolicy,
}

impl AuthConfig {
    /// Load from process environment.
    ///
    /// - `JWT_SECRET` (required)
    /// - `JWT_ISSUER` (default `hr-backend`)
    /// - `JWT_EXPIRATION_MINUTES` (default 15)
    /// - `TOTP_ISSUER` (default `HR Backend`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let ttl_minutes = match lookup("JWT_EXPIRATION_MINUTES") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
                key: "JWT_EXPIRATION_MINUTES",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TTL_MINUTES,
        };
        let ttl = Duration::try_minutes(ttl_minutes).ok_or(ConfigError::InvalidTtl)?;

        let totp_issuer = lookup("TOTP_ISSUER").unwrap_or_else(|| DEFAULT_TOTP_ISSUER.to_string());

        let token = TokenConfig::new(secret.into_bytes(), issuer, ttl);
        token.validate()?;

        Ok(Self {
            token,
            totp_issuer,
            routes: RoutePolicy::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn missing_secret_is_fatal() {
        let err = AuthConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "dev-secret")])).unwrap_err();
        assert_eq!(err, ConfigError::WeakSigningKey { min: 32, actual: 10 });
    }

    #[test]
    fn defaults_apply() {
        let cfg = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", KEY)])).unwrap();
        assert_eq!(cfg.token.issuer, DEFAULT_ISSUER);
        assert_eq!(cfg.token.ttl, Duration::minutes(15));
        assert_eq!(cfg.totp_issuer, DEFAULT_TOTP_ISSUER);
    }

    #[test]
    fn overrides_and_bad_ttl() {
        let cfg = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", KEY),
            ("JWT_ISSUER", "acme"),
            ("JWT_EXPIRATION_MINUTES", "60"),
        ]))
        .unwrap();
        assert_eq!(cfg.token.issuer, "acme");
        assert_eq!(cfg.token.ttl, Duration::hours(1));

        let err = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", KEY),
            ("JWT_EXPIRATION_MINUTES", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTtl);

        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[
                ("JWT_SECRET", KEY),
                ("JWT_EXPIRATION_MINUTES", "soon"),
            ])),
            Err(ConfigError::Invalid { key: "JWT_EXPIRATION_MINUTES", .. })
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = TokenConfig::new(KEY.as_bytes().to_vec(), "acme", Duration::minutes(1));
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains(KEY));
        assert!(rendered.contains("REDACTED"));
    }
}
