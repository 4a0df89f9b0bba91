use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use realty_auth::{RoleChecker, TokenVerifier};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Verify the bearer token and attach its claims to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.verifier.verify(token, Utc::now())?;

    req.extensions_mut().insert(PrincipalContext::new(claims));

    Ok(next.run(req).await)
}

/// Admit the request only if the attached principal passes `checker`.
pub async fn require_role(
    State(checker): State<Arc<dyn RoleChecker>>,
    principal: Option<Extension<PrincipalContext>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = principal.as_ref().map(|Extension(p)| p.claims());
    if let Err(denied) = checker.check(claims) {
        tracing::info!(gate = checker.name(), reason = %denied, "request denied");
        return Err(denied.into());
    }
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::unauthorized("missing bearer token");

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(missing)?;

    let header = header.to_str().map_err(|_| missing())?;

    let header = header.strip_prefix("Bearer ").ok_or_else(missing)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(missing());
    }

    Ok(token)
}
