//! In-memory account directory (dev/test wiring).
//!
//! Stands in for the relational user table: email, display name, role,
//! password hash and two-factor state. Nothing here is persisted.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use argon2::Argon2;

use hrgate_auth::{Role, TwoFactorEnrollment};

use crate::password;

pub struct Account {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    password_hash: String,
    pub two_factor: TwoFactorEnrollment,
}

impl Account {
    pub fn new(email: impl Into<String>, full_name: impl Into<String>, role: Role, password_hash: String) -> Self {
        Self {
            email: email.into(),
            full_name: full_name.into(),
            role,
            password_hash,
            two_factor: TwoFactorEnrollment::default(),
        }
    }
}

impl core::fmt::Debug for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Account")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("two_factor", &self.two_factor)
            .finish_non_exhaustive()
    }
}

/// Accounts keyed by email.
#[derive(Debug, Default)]
pub struct AccountStore {
    inner: RwLock<HashMap<String, Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the account with the same email.
    pub fn insert(&self, account: Account) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.insert(account.email.clone(), account);
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn with_account<R>(&self, email: &str, f: impl FnOnce(&Account) -> R) -> Option<R> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.get(email).map(f)
    }

    pub fn with_account_mut<R>(&self, email: &str, f: impl FnOnce(&mut Account) -> R) -> Option<R> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.get_mut(email).map(f)
    }

    /// Copy of the stored PHC hash, so the (slow) comparison can run
    /// without holding the lock.
    pub fn password_hash(&self, email: &str) -> Option<String> {
        self.with_account(email, |a| a.password_hash.clone())
    }

    /// Create an account with a freshly hashed password.
    pub fn register(
        &self,
        argon2: &Argon2<'_>,
        email: &str,
        full_name: &str,
        role: Role,
        plain_password: &str,
    ) -> Result<()> {
        let hash = password::hash_password(argon2, plain_password)?;
        self.insert(Account::new(email, full_name, role, hash));
        Ok(())
    }
}

/// One account per role, sharing `password`. Only for local development.
pub fn seed_demo_accounts(store: &AccountStore, argon2: &Argon2<'_>, password: &str) -> Result<()> {
    if !store.is_empty() {
        return Ok(());
    }
    store.register(argon2, "se@hr.local", "System Engineer", Role::SystemEngineer, password)?;
    store.register(argon2, "manager@hr.local", "Manager Mary", Role::Manager, password)?;
    store.register(argon2, "emp@hr.local", "Employee Evan", Role::Employee, password)?;
    Ok(())
}
