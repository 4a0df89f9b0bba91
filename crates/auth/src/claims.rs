use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use realty_core::{AccountId, ErrorKind};

use crate::Role;

/// JWT claims model.
///
/// Claims are never stored: they are rebuilt from the signed payload on every
/// verification. Timestamps are unix seconds, as registered JWT claims require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / account identifier.
    pub sub: AccountId,

    /// Role granted at issuance. Not re-read from storage when verifying.
    pub role: Role,

    /// Issued-at.
    pub iat: i64,

    /// Not-before.
    pub nbf: i64,

    /// Expiry.
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: AccountId, role: Role, issued_at: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub,
            role,
            iat,
            nbf: iat,
            exp: iat + ttl.num_seconds(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed token, unknown role, or an empty validity window.
    #[error("invalid token")]
    Invalid,

    #[error("token expired")]
    Expired,

    #[error("token not valid yet")]
    NotYetValid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Signing(_) => ErrorKind::Internal,
            _ => ErrorKind::Unauthorized,
        }
    }
}

/// Deterministically validate the claims' time window against `now`.
///
/// Signature verification happens before this, in the token service.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.nbf {
        return Err(TokenError::Invalid);
    }
    let now = now.timestamp();
    if now < claims.nbf {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}
