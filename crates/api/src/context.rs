use realty_auth::{Claims, Role};
use realty_core::AccountId;

/// Principal context for a request (verified token claims).
///
/// Inserted by the auth middleware; handlers and role gates read it as a
/// typed extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    claims: Claims,
}

impl PrincipalContext {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn account_id(&self) -> AccountId {
        self.claims.sub
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
