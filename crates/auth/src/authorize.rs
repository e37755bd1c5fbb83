//! Route-level authorization policy.
//!
//! A static, ordered table of path prefixes (optionally restricted to one
//! HTTP method) mapped to access requirements. Evaluation is
//! first-match-wins; nothing here knows about business logic.
//!
//! - No IO
//! - No panics
//! - No shared mutable state (built once at startup, read-only afterwards)

use crate::{AuthError, Principal, Role, RoleSet};

/// Access requirement for one route prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    /// Open to everyone, including anonymous callers.
    Anonymous,
    /// Any authenticated principal, whatever the role.
    Authenticated,
    /// Principal's role must be in the set.
    Roles(RoleSet),
    /// Nobody.
    Deny,
}

impl Access {
    fn evaluate(&self, principal: Option<&Principal>) -> Result<(), AuthError> {
        match (self, principal) {
            (Access::Anonymous, _) => Ok(()),
            (_, None) => Err(AuthError::Unauthenticated),
            (Access::Authenticated, Some(_)) => Ok(()),
            (Access::Roles(roles), Some(p)) if roles.contains(p.role) => Ok(()),
            (Access::Roles(_), Some(_)) | (Access::Deny, Some(_)) => Err(AuthError::Forbidden),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteRule {
    /// Upper-case method name; `None` matches every method.
    method: Option<String>,
    prefix: String,
    access: Access,
}

impl RouteRule {
    /// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/x`
    /// but not `/administrator`.
    fn matches(&self, method: &str, path: &str) -> bool {
        if self.method.as_deref().is_some_and(|m| m != method) {
            return false;
        }
        if self.prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Ordered prefix → access table with a fallback for unmatched paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    fallback: Access,
}

/// Outcome of one policy evaluation, with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Matched prefix, or `None` when the fallback applied.
    pub matched_prefix: Option<String>,
    pub allowed: bool,
    pub error: Option<AuthError>,
}

impl RoutePolicy {
    pub fn builder() -> RoutePolicyBuilder {
        RoutePolicyBuilder::default()
    }

    /// Evaluate `method path` for `principal` (None = anonymous).
    pub fn decide(&self, method: &str, path: &str, principal: Option<&Principal>) -> Decision {
        let rule = self.rules.iter().find(|r| r.matches(method, path));
        let access = rule.map(|r| r.access).unwrap_or(self.fallback);
        let outcome = access.evaluate(principal);

        Decision {
            matched_prefix: rule.map(|r| r.prefix.clone()),
            allowed: outcome.is_ok(),
            error: outcome.err(),
        }
    }
}

impl Default for RoutePolicy {
    /// The HR backend's table:
    ///
    /// | method  | prefix      | access                             |
    /// |---------|-------------|------------------------------------|
    /// | OPTIONS | `/`         | anonymous (CORS preflight)         |
    /// | any     | `/auth`     | anonymous                          |
    /// | GET     | `/health`   | anonymous                          |
    /// | any     | `/system`   | SYSTEM_ENGINEER                    |
    /// | any     | `/admin`    | MANAGER, SYSTEM_ENGINEER           |
    /// | any     | `/employee` | EMPLOYEE, MANAGER, SYSTEM_ENGINEER |
    /// | any     | otherwise   | any authenticated principal        |
    fn default() -> Self {
        RoutePolicy::builder()
            .method_rule("OPTIONS", "/", Access::Anonymous)
            .anonymous("/auth")
            .method_rule("GET", "/health", Access::Anonymous)
            .require("/system", &[Role::SystemEngineer])
            .require("/admin", &[Role::Manager, Role::SystemEngineer])
            .require("/employee", &Role::ALL)
            .fallback(Access::Authenticated)
            .build()
    }
}

/// Builder for [`RoutePolicy`]. Rules are evaluated in insertion order.
/// Unmatched paths are denied unless a fallback is set.
#[derive(Debug)]
pub struct RoutePolicyBuilder {
    rules: Vec<RouteRule>,
    fallback: Access,
}

impl Default for RoutePolicyBuilder {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Access::Deny,
        }
    }
}

impl RoutePolicyBuilder {
    /// Rule for every method under `prefix`.
    pub fn rule(self, prefix: &str, access: Access) -> Self {
        self.push(None, prefix, access)
    }

    /// Rule that only applies to requests with `method` (e.g. `"OPTIONS"`).
    pub fn method_rule(self, method: &str, prefix: &str, access: Access) -> Self {
        self.push(Some(method.to_ascii_uppercase()), prefix, access)
    }

    pub fn anonymous(self, prefix: &str) -> Self {
        self.rule(prefix, Access::Anonymous)
    }

    pub fn require(self, prefix: &str, roles: &[Role]) -> Self {
        self.rule(prefix, Access::Roles(RoleSet::of(roles)))
    }

    pub fn fallback(mut self, access: Access) -> Self {
        self.fallback = access;
        self
    }

    fn push(mut self, method: Option<String>, prefix: &str, access: Access) -> Self {
        self.rules.push(RouteRule {
            method,
            prefix: prefix.trim_end_matches('/').to_string(),
            access,
        });
        self
    }

    pub fn build(self) -> RoutePolicy {
        RoutePolicy {
            rules: self.rules,
            fallback: self.fallback,
        }
    }
}
