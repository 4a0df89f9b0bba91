use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use realty_core::{AccountId, ErrorKind};

use crate::{CredentialError, CredentialStore, TokenError, TokenIssuer};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl LoginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoginError::Credentials(e) => e.kind(),
            LoginError::Token(e) => e.kind(),
        }
    }
}

/// Credentialed login: verify the password, then mint a token for the stored role.
#[derive(Clone)]
pub struct Login {
    credentials: CredentialStore,
    issuer: Arc<dyn TokenIssuer>,
    ttl: Duration,
}

impl Login {
    pub fn new(credentials: CredentialStore, issuer: Arc<dyn TokenIssuer>, ttl: Duration) -> Self {
        Self {
            credentials,
            issuer,
            ttl,
        }
    }

    pub async fn login(
        &self,
        id: AccountId,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, LoginError> {
        let account = match self.credentials.verify_credentials(id, password).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(account_id = %id, reason = %e, "login rejected");
                return Err(e.into());
            }
        };
        let token = self.issuer.issue(account.id, account.role, self.ttl, now)?;
        tracing::info!(account_id = %account.id, role = %account.role, "login succeeded");
        Ok(token)
    }
}
