//! Cross-origin settings for browser clients.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Allowed browser origins. An empty list admits any origin, which is only
/// meant for local frontend development.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    allowed_origins: Vec<HeaderValue>,
}

impl CorsConfig {
    /// Reads `CORS_ALLOWED_ORIGINS` (comma separated). Unset or blank means
    /// any origin.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
        Self::from_origins(raw.split(','))
    }

    pub fn from_origins<I, S>(origins: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed_origins = Vec::new();
        for origin in origins {
            let origin = origin.as_ref().trim();
            if origin.is_empty() {
                continue;
            }
            let value = HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin '{origin}'"))?;
            allowed_origins.push(value);
        }
        Ok(Self { allowed_origins })
    }

    pub fn layer(&self) -> CorsLayer {
        let origin = if self.allowed_origins.is_empty() {
            tracing::warn!("CORS allows any origin");
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::list(self.allowed_origins.clone())
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
            .max_age(PREFLIGHT_MAX_AGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_entries_are_skipped() {
        let cfg = CorsConfig::from_origins(" https://hr.example , ,http://localhost:5173".split(',')).unwrap();
        assert_eq!(cfg.allowed_origins.len(), 2);
        assert_eq!(cfg.allowed_origins[0], "https://hr.example");
    }

    #[test]
    fn header_unsafe_origin_is_rejected() {
        assert!(CorsConfig::from_origins(["https://bad\norigin"]).is_err());
    }
}
