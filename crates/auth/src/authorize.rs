use thiserror::Error;

use realty_core::ErrorKind;

use crate::{Claims, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    /// The request reached a role gate without verified claims.
    #[error("forbidden: no authenticated principal")]
    MissingClaims,

    #[error("forbidden: role '{0}' may not perform this operation")]
    RoleNotAllowed(Role),
}

impl AccessDenied {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Forbidden
    }
}

/// Admit or deny a principal against a set of allowed roles.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(claims: Option<&Claims>, allowed: &[Role]) -> Result<(), AccessDenied> {
    let claims = claims.ok_or(AccessDenied::MissingClaims)?;
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AccessDenied::RoleNotAllowed(claims.role))
    }
}

/// A gate stage: a named, fixed set of roles it admits.
pub trait RoleChecker: Send + Sync {
    fn name(&self) -> &'static str;

    fn allowed_roles(&self) -> &[Role];

    fn check(&self, claims: Option<&Claims>) -> Result<(), AccessDenied> {
        authorize(claims, self.allowed_roles())
    }
}

/// Any recognised role.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthOnly;

impl RoleChecker for AuthOnly {
    fn name(&self) -> &'static str {
        "auth_only"
    }

    fn allowed_roles(&self) -> &[Role] {
        &Role::ALL
    }
}

/// Moderators only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModerationOnly;

impl RoleChecker for ModerationOnly {
    fn name(&self) -> &'static str {
        "moderation_only"
    }

    fn allowed_roles(&self) -> &[Role] {
        &[Role::Moderator]
    }
}
