//! Stateless token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use realty_core::AccountId;

use crate::{Claims, Role, TokenError, validate_claims};

/// Capability: mint a signed token for a subject.
pub trait TokenIssuer: Send + Sync {
    fn issue(
        &self,
        subject: AccountId,
        role: Role,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError>;
}

/// Capability: turn a presented token back into verified claims.
///
/// Verification is pure computation; implementations must not touch storage.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

/// HMAC-SHA256 signed JWTs sharing one secret for issuing and verifying.
#[derive(Clone)]
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        // Time-window checks run in `validate_claims` against an explicit `now`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService").finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256TokenService {
    fn issue(
        &self,
        subject: AccountId,
        role: Role,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject, role, now, ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenVerifier for Hs256TokenService {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                TokenError::Invalid
            })?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
