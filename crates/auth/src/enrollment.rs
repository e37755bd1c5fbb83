//! Per-account two-factor enrollment state machine.
//!
//! ```text
//! Disabled --begin_setup--> Pending --confirm(ok)--> Enabled
//! Pending  --begin_setup--> Pending   (old secret discarded)
//! Enabled  --begin_setup--> Pending   (old secret discarded)
//! Enabled  --disable------> Disabled  (code checked when supplied)
//! ```

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::AuthError;
use crate::totp;

/// Secret and provisioning URI handed to the user once, at setup time.
#[derive(Clone, Serialize)]
pub struct EnrollmentOffer {
    pub secret: String,
    #[serde(rename = "otpauthUrl")]
    pub otpauth_url: String,
}

impl core::fmt::Debug for EnrollmentOffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EnrollmentOffer").finish_non_exhaustive()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnrollmentState {
    Disabled,
    Pending,
    Enabled,
}

/// Two-factor state for one account. The secret is never exposed after
/// [`TwoFactorEnrollment::begin_setup`] returns.
#[derive(Default)]
pub enum TwoFactorEnrollment {
    #[default]
    Disabled,
    Pending { secret: SecretString },
    Enabled { secret: SecretString },
}

impl TwoFactorEnrollment {
    pub fn state(&self) -> EnrollmentState {
        match self {
            Self::Disabled => EnrollmentState::Disabled,
            Self::Pending { .. } => EnrollmentState::Pending,
            Self::Enabled { .. } => EnrollmentState::Enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Generate a fresh secret and move to `Pending`, discarding any previous
    /// secret so codes derived from it never validate again.
    pub fn begin_setup(&mut self, issuer: &str, account_name: &str) -> EnrollmentOffer {
        let secret = totp::generate_secret(totp::MIN_SECRET_BYTES);
        let otpauth_url = totp::build_enrollment_uri(issuer, account_name, &secret);
        *self = Self::Pending {
            secret: SecretString::new(secret.clone()),
        };
        tracing::debug!(state = ?self.state(), "two-factor setup started");
        EnrollmentOffer { secret, otpauth_url }
    }

    /// Confirm the pending secret with one correct code. A wrong code
    /// leaves the state unchanged.
    pub fn confirm(&mut self, code: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let secret = self.secret().ok_or(AuthError::OtpNotInitialized)?;
        if !totp::verify_code(secret.expose_secret(), code, now) {
            return Err(AuthError::InvalidOtpCode);
        }
        if matches!(self, Self::Pending { .. }) {
            if let Self::Pending { secret } = core::mem::take(self) {
                *self = Self::Enabled { secret };
            }
        }
        Ok(())
    }

    /// Turn two-factor off. A supplied code must match the stored secret.
    pub fn disable(&mut self, code: Option<&str>, now: DateTime<Utc>) -> Result<(), AuthError> {
        if let (Some(code), Some(secret)) = (code, self.secret()) {
            if !totp::verify_code(secret.expose_secret(), code, now) {
                return Err(AuthError::InvalidOtpCode);
            }
        }
        *self = Self::Disabled;
        Ok(())
    }

    /// Step-up check used at login. Accounts without 2FA enabled pass.
    pub fn verify_step_up(&self, code: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        match self {
            Self::Enabled { secret } if !totp::verify_code(secret.expose_secret(), code, now) => {
                Err(AuthError::InvalidOtpCode)
            }
            _ => Ok(()),
        }
    }

    fn secret(&self) -> Option<&SecretString> {
        match self {
            Self::Disabled => None,
            Self::Pending { secret } | Self::Enabled { secret } => Some(secret),
        }
    }
}

impl core::fmt::Debug for TwoFactorEnrollment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("TwoFactorEnrollment").field(&self.state()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_for(offer: &EnrollmentOffer, now: DateTime<Utc>) -> String {
        let secret = totp::TotpSecret::from_base32(&offer.secret).unwrap();
        totp::compute_code(&secret, totp::time_step(now) as u64)
    }

    #[test]
    fn setup_then_confirm_enables() {
        let now = Utc::now();
        let mut tfa = TwoFactorEnrollment::default();
        assert_eq!(tfa.state(), EnrollmentState::Disabled);

        let offer = tfa.begin_setup("HR Backend", "alice@x.com");
        assert_eq!(tfa.state(), EnrollmentState::Pending);
        assert!(offer.otpauth_url.contains(&offer.secret));

        tfa.confirm(&code_for(&offer, now), now).unwrap();
        assert!(tfa.is_enabled());
    }

    #[test]
    fn confirm_without_setup_is_rejected() {
        let mut tfa = TwoFactorEnrollment::default();
        assert_eq!(tfa.confirm("123456", Utc::now()), Err(AuthError::OtpNotInitialized));
        assert_eq!(tfa.state(), EnrollmentState::Disabled);
    }

    #[test]
    fn wrong_code_leaves_state_unchanged() {
        let now = Utc::now();
        let mut tfa = TwoFactorEnrollment::default();
        let offer = tfa.begin_setup("HR Backend", "bob@x.com");
        assert_eq!(tfa.confirm("abcdef", now), Err(AuthError::InvalidOtpCode));
        assert_eq!(tfa.state(), EnrollmentState::Pending);

        tfa.confirm(&code_for(&offer, now), now).unwrap();
        assert_eq!(tfa.confirm("abcdef", now), Err(AuthError::InvalidOtpCode));
        assert!(tfa.is_enabled());
    }

    #[test]
    fn re_setup_discards_previous_secret() {
        let now = Utc::now();
        let mut tfa = TwoFactorEnrollment::default();
        let first = tfa.begin_setup("HR Backend", "carol@x.com");
        let second = tfa.begin_setup("HR Backend", "carol@x.com");
        assert_ne!(first.secret, second.secret);

        let old_code = code_for(&first, now);
        if old_code != code_for(&second, now) {
            assert_eq!(tfa.confirm(&old_code, now), Err(AuthError::InvalidOtpCode));
        }
        tfa.confirm(&code_for(&second, now), now).unwrap();
        assert!(tfa.is_enabled());
    }

    #[test]
    fn disable_checks_supplied_code_only() {
        let now = Utc::now();
        let mut tfa = TwoFactorEnrollment::default();
        let offer = tfa.begin_setup("HR Backend", "dave@x.com");
        tfa.confirm(&code_for(&offer, now), now).unwrap();

        assert_eq!(tfa.disable(Some("abcdef"), now), Err(AuthError::InvalidOtpCode));
        assert!(tfa.is_enabled());

        tfa.disable(Some(&code_for(&offer, now)), now).unwrap();
        assert_eq!(tfa.state(), EnrollmentState::Disabled);

        let mut other = TwoFactorEnrollment::default();
        other.begin_setup("HR Backend", "erin@x.com");
        other.disable(None, now).unwrap();
        assert_eq!(other.state(), EnrollmentState::Disabled);
    }

    #[test]
    fn step_up_only_applies_when_enabled() {
        let now = Utc::now();
        let mut tfa = TwoFactorEnrollment::default();
        assert!(tfa.verify_step_up("", now).is_ok());

        let offer = tfa.begin_setup("HR Backend", "frank@x.com");
        assert!(tfa.verify_step_up("", now).is_ok());

        tfa.confirm(&code_for(&offer, now), now).unwrap();
        assert_eq!(tfa.verify_step_up("000", now), Err(AuthError::InvalidOtpCode));
        assert!(tfa.verify_step_up(&code_for(&offer, now), now).is_ok());
    }

    #[test]
    fn debug_shows_state_only() {
        let mut tfa = TwoFactorEnrollment::default();
        let offer = tfa.begin_setup("HR Backend", "gina@x.com");
        let rendered = format!("{tfa:?} {offer:?}");
        assert!(!rendered.contains(&offer.secret));
        assert!(rendered.contains("Pending"));
    }
}
