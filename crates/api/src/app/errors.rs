use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use realty_auth::{AccessDenied, CredentialError, InvalidRole, LoginError, TokenError};
use realty_catalog::CatalogError;
use realty_core::{ErrorKind, FieldError};

/// Boundary error: a kind that picks the status, plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.kind == ErrorKind::Internal {
            tracing::error!(error = %self.message, "internal error");
            return json_error(self.status(), self.kind.as_str(), "internal error");
        }
        json_error(self.status(), self.kind.as_str(), self.message)
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<InvalidRole> for ApiError {
    fn from(err: InvalidRole) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<AccessDenied> for ApiError {
    fn from(err: AccessDenied) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// An unknown account and a wrong password both answer 401 `invalid credentials`,
/// so the response does not reveal which account ids exist. The distinct variants are
/// still logged by `Login`.
impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err.kind() {
            ErrorKind::Unauthorized => Self::unauthorized("invalid credentials"),
            kind => Self::new(kind, err.to_string()),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Credentials(e) => e.into(),
            LoginError::Token(e) => Self::new(ErrorKind::Internal, e.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
