//! Role-only token minting for bootstrap and testing.
//!
//! Nothing here checks a credential. The module is compiled only with the
//! `dummy-login` feature and shares no code path with [`crate::Login`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use realty_core::AccountId;

use crate::{Role, TokenError, TokenIssuer};

/// Subject carried by every dummy token. Serial account ids start at 1.
pub const DUMMY_SUBJECT: AccountId = AccountId::new(0);

#[derive(Clone)]
pub struct DummyLogin {
    issuer: Arc<dyn TokenIssuer>,
    ttl: Duration,
}

impl DummyLogin {
    pub fn new(issuer: Arc<dyn TokenIssuer>, ttl: Duration) -> Self {
        Self { issuer, ttl }
    }

    pub fn issue(&self, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        tracing::info!(role = %role, "issuing dummy token");
        self.issuer.issue(DUMMY_SUBJECT, role, self.ttl, now)
    }
}
