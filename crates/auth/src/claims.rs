use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuthError, Role};

/// Claim set carried inside a session token.
///
/// Timestamps travel as Unix seconds (`iat`/`exp`), which keeps the payload
/// compatible with standard JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the account identifier (email).
    pub sub: String,

    /// Issuer; must equal the configured issuer exactly.
    pub iss: String,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,

    /// Role at issuance time. Not re-derived on verification.
    pub role: Role,
}

/// Deterministically validate the claim time window.
///
/// A token is valid up to and including its `exp` second.
pub fn validate_time_window(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), AuthError> {
    if claims.exp <= claims.iat {
        return Err(AuthError::Malformed);
    }
    if now > claims.exp {
        return Err(AuthError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims_at(iat: DateTime<Utc>, lifetime: Duration) -> SessionClaims {
        SessionClaims {
            sub: "alice@x.com".to_string(),
            iss: "hr-backend".to_string(),
            iat,
            exp: iat + lifetime,
            role: Role::Employee,
        }
    }

    #[test]
    fn inverted_window_is_malformed() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(t, Duration::zero());
        assert_eq!(validate_time_window(&claims, t), Err(AuthError::Malformed));
    }

    #[test]
    fn exp_second_itself_is_still_valid() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(t, Duration::seconds(60));
        assert_eq!(validate_time_window(&claims, t + Duration::seconds(60)), Ok(()));
        assert_eq!(
            validate_time_window(&claims, t + Duration::seconds(61)),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn timestamps_serialize_as_unix_seconds() {
        let t = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = claims_at(t, Duration::seconds(900));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_000_900);
        assert_eq!(json["role"], "EMPLOYEE");
    }
}
