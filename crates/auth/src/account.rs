//! Account records and the credential store.
//!
//! Accounts are created by registration and never edited afterwards. The
//! store owns password hashing: callers hand in plaintext exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use realty_core::{AccountId, ErrorKind, FieldError, StoreError, StoreResult, validate};

use crate::password::{self, PasswordError};
use crate::roles::InvalidRole;
use crate::Role;

/// Minimum accepted password length (characters).
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl core::fmt::Debug for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// An account ready to persist. The id is assigned by the store.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Persistence port for accounts.
///
/// `insert` must reject a duplicate email with [`StoreError::UniqueViolation`]
/// atomically (unique index or single critical section), never via a prior lookup.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn insert(&self, account: NewAccount) -> StoreResult<Account>;

    async fn find(&self, id: AccountId) -> StoreResult<Option<Account>>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("an account with this email already exists")]
    DuplicateIdentity,

    #[error(transparent)]
    InvalidRole(#[from] InvalidRole),

    #[error("validation failed: {0}")]
    Validation(#[from] FieldError),

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("invalid password")]
    InvalidPassword,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(StoreError),

    #[error("hashing task failed: {0}")]
    Blocking(String),
}

impl CredentialError {
    /// Unknown account and wrong password share a kind so the wire cannot tell them apart.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CredentialError::DuplicateIdentity => ErrorKind::Conflict,
            CredentialError::InvalidRole(_) | CredentialError::Validation(_) => {
                ErrorKind::ValidationFailed
            }
            CredentialError::AccountNotFound(_) | CredentialError::InvalidPassword => {
                ErrorKind::Unauthorized
            }
            CredentialError::Password(_)
            | CredentialError::Store(_)
            | CredentialError::Blocking(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => CredentialError::DuplicateIdentity,
            other => CredentialError::Store(other),
        }
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    accounts: Arc<dyn AccountRepository>,
}

impl CredentialStore {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Register an account and return its id.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<AccountId, CredentialError> {
        let role: Role = role.parse()?;
        let email = validate::email("email", email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FieldError::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            )
            .into());
        }

        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
            .await
            .map_err(|e| CredentialError::Blocking(e.to_string()))??;

        let account = self
            .accounts
            .insert(NewAccount {
                email,
                password_hash,
                role,
            })
            .await?;

        tracing::info!(account_id = %account.id, role = %account.role, "account registered");
        Ok(account.id)
    }

    /// Check a password against the stored hash and return the account on success.
    pub async fn verify_credentials(
        &self,
        id: AccountId,
        password: &str,
    ) -> Result<Account, CredentialError> {
        let account = self
            .accounts
            .find(id)
            .await?
            .ok_or(CredentialError::AccountNotFound(id))?;

        let plaintext = password.to_string();
        let hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
            .await
            .map_err(|e| CredentialError::Blocking(e.to_string()))??;

        if matches {
            Ok(account)
        } else {
            Err(CredentialError::InvalidPassword)
        }
    }
}
