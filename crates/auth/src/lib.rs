//! `hrgate-auth` — authentication/authorization core of the HR backend.
//!
//! Session tokens, TOTP second factor, per-request authentication and the
//! route policy. This crate is intentionally decoupled from HTTP and storage.

pub mod authenticate;
pub mod authorize;
pub mod claims;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod principal;
pub mod roles;
pub mod token;
pub mod totp;

pub use authenticate::{RequestAuthenticator, extract_bearer};
pub use authorize::{Access, Decision, RoutePolicy, RoutePolicyBuilder};
pub use claims::SessionClaims;
pub use config::{AuthConfig, TokenConfig};
pub use enrollment::{EnrollmentOffer, EnrollmentState, TwoFactorEnrollment};
pub use error::{AuthError, ConfigError};
pub use principal::Principal;
pub use roles::{Role, RoleSet};
pub use token::{IssuedToken, TokenService};
pub use totp::TotpSecret;
