//! Time-based one-time passwords (RFC 6238).
//!
//! Fixed parameters: HMAC-SHA1, 30 second step, 6 decimal digits, Base32
//! secrets without padding. Verification accepts the previous, current and
//! next step to absorb clock skew between server and authenticator app.

use chrono::{DateTime, Utc};
use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use secrecy::zeroize::Zeroize;
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::AuthError;

type HmacSha1 = Hmac<Sha1>;

pub const TIME_STEP_SECONDS: i64 = 30;
pub const CODE_DIGITS: usize = 6;
pub const MIN_SECRET_BYTES: usize = 20;

const CODE_MODULUS: u32 = 1_000_000;
const DRIFT_STEPS: i64 = 1;

/// A decoded TOTP shared secret, held as a pre-keyed MAC.
pub struct TotpSecret {
    mac: HmacSha1,
}

impl TotpSecret {
    /// Decode a Base32 secret. Whitespace, hyphens and `=` padding are
    /// ignored and lower case is accepted, so grouped forms such as
    /// `gezd-gnbv gy3t` decode.
    pub fn from_base32(encoded: &str) -> Result<Self, AuthError> {
        let mut normalized: String = encoded
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=' && *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if normalized.is_empty() {
            return Err(AuthError::Malformed);
        }

        let decoded = BASE32_NOPAD.decode(normalized.as_bytes());
        normalized.zeroize();
        let mut bytes = decoded.map_err(|_| AuthError::Malformed)?;

        let secret = Self::from_bytes(&bytes);
        bytes.zeroize();
        secret
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        if bytes.is_empty() {
            return Err(AuthError::Malformed);
        }
        let mac = HmacSha1::new_from_slice(bytes).map_err(|_| AuthError::Malformed)?;
        Ok(Self { mac })
    }
}

impl core::fmt::Debug for TotpSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TotpSecret([REDACTED])")
    }
}

/// Draw `byte_len` random bytes (at least [`MIN_SECRET_BYTES`]) from the OS
/// CSPRNG and return them Base32-encoded without padding.
pub fn generate_secret(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len.max(MIN_SECRET_BYTES)];
    OsRng.fill_bytes(&mut bytes);
    let encoded = BASE32_NOPAD.encode(&bytes);
    bytes.zeroize();
    encoded
}

/// Time-step counter for `now`: `floor(unix_seconds / 30)`.
pub fn time_step(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(TIME_STEP_SECONDS)
}

/// Compute the 6-digit code for one time-step counter.
pub fn compute_code(secret: &TotpSecret, counter: u64) -> String {
    let mut mac = secret.mac.clone();
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // Dynamic truncation.
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    format!("{:0width$}", binary % CODE_MODULUS, width = CODE_DIGITS)
}

/// Verify a submitted code against a Base32 secret at time `now`.
///
/// Returns false for an empty or undecodable secret, for codes shorter than
/// six characters, and for codes matching none of the three accepted steps.
pub fn verify_code(secret: &str, code: &str, now: DateTime<Utc>) -> bool {
    if secret.trim().is_empty() || code.len() < CODE_DIGITS {
        return false;
    }
    match TotpSecret::from_base32(secret) {
        Ok(secret) => verify_with_secret(&secret, code, now),
        Err(_) => false,
    }
}

/// Same as [`verify_code`] for an already decoded secret.
fn verify_with_secret(secret: &TotpSecret, code: &str, now: DateTime<Utc>) -> bool {
    let submitted: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    if submitted.len() != CODE_DIGITS || !submitted.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let current = time_step(now);
    for step in (current - DRIFT_STEPS)..=(current + DRIFT_STEPS) {
        let Ok(counter) = u64::try_from(step) else {
            continue;
        };
        let expected = compute_code(secret, counter);
        if bool::from(expected.as_bytes().ct_eq(submitted.as_bytes())) {
            return true;
        }
    }
    false
}

/// Build the `otpauth://` URI consumed by authenticator apps.
pub fn build_enrollment_uri(issuer: &str, account_name: &str, secret: &str) -> String {
    let issuer = urlencoding::encode(issuer);
    format!(
        "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&digits={CODE_DIGITS}&period={TIME_STEP_SECONDS}&algorithm=SHA1",
        account = urlencoding::encode(account_name),
        secret = urlencoding::encode(secret),
    )
}
