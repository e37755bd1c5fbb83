use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{Principal, TokenService};

const BEARER_PREFIX: &str = "Bearer ";

/// Per-request authentication boundary.
///
/// Turns an `Authorization` header value into a [`Principal`], or `None` for
/// anonymous. A bad token degrades the request to anonymous instead of
/// aborting it; the allow/deny decision belongs to
/// [`RoutePolicy`](crate::RoutePolicy), which denies anonymous access to
/// every protected prefix.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    tokens: Arc<TokenService>,
}

impl RequestAuthenticator {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    pub fn authenticate(&self, authorization: Option<&str>, now: DateTime<Utc>) -> Option<Principal> {
        let token = extract_bearer(authorization?)?;

        match self.tokens.verify(token, now) {
            Ok(claims) => Some(Principal::from(claims)),
            Err(err) => {
                tracing::debug!(error = %err, "bearer token rejected; continuing as anonymous");
                None
            }
        }
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, TokenConfig};
    use chrono::Duration;

    fn authenticator() -> (RequestAuthenticator, Arc<TokenService>) {
        let tokens = Arc::new(
            TokenService::new(TokenConfig::new(
                b"authenticator-test-key-0123456789".to_vec(),
                "hr-backend",
                Duration::minutes(15),
            ))
            .unwrap(),
        );
        (RequestAuthenticator::new(tokens.clone()), tokens)
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Bearer   abc  "), Some("abc"));
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_bearer("bearer abc"), None);
        assert_eq!(extract_bearer("abc.def.ghi"), None);
    }

    #[test]
    fn valid_token_yields_principal() {
        let (auth, tokens) = authenticator();
        let now = Utc::now();
        let issued = tokens.issue("alice@x.com", Role::Manager, now).unwrap();
        let header = format!("Bearer {}", issued.token);

        let principal = auth.authenticate(Some(&header), now).unwrap();
        assert_eq!(principal, Principal::new("alice@x.com", Role::Manager));
    }

    #[test]
    fn missing_or_bad_credentials_are_anonymous() {
        let (auth, tokens) = authenticator();
        let now = Utc::now();
        let issued = tokens.issue("alice@x.com", Role::Employee, now).unwrap();

        assert_eq!(auth.authenticate(None, now), None);
        assert_eq!(auth.authenticate(Some("Bearer not-a-token"), now), None);
        assert_eq!(auth.authenticate(Some(&issued.token), now), None);

        let expired_at = now + Duration::minutes(16);
        let header = format!("Bearer {}", issued.token);
        assert_eq!(auth.authenticate(Some(&header), expired_at), None);
    }
}
