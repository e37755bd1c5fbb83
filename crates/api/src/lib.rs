//! HTTP API: router, authentication middleware and the auth endpoints.
//!
//! Employee, leave, attendance and inventory CRUD live behind the same
//! middleware but are not part of this crate; the `/system`, `/admin` and
//! `/employee` ping handlers stand in for them.

pub mod accounts;
pub mod app;
pub mod middleware;
pub mod password;
