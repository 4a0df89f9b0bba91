use std::sync::Arc;

use axum::{Json, extract::Extension};
use chrono::Utc;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::{ApiJson, dto};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::RegisterRequest>,
) -> Result<Json<dto::RegisterResponse>, ApiError> {
    let user_id = services
        .credentials
        .register(&body.email, &body.password, &body.user_type)
        .await?;
    Ok(Json(dto::RegisterResponse { user_id }))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::LoginRequest>,
) -> Result<Json<dto::TokenResponse>, ApiError> {
    let token = services.login.login(body.id, &body.password, Utc::now()).await?;
    Ok(Json(dto::TokenResponse { token }))
}

#[cfg(feature = "dummy-login")]
pub async fn dummy_login(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<axum::extract::Query<dto::DummyLoginQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<dto::TokenResponse>, ApiError> {
    let dummy = services
        .dummy
        .as_ref()
        .ok_or_else(|| ApiError::not_found("dummy login is disabled"))?;

    let axum::extract::Query(query) = query?;
    let role: realty_auth::Role = query
        .user_type
        .ok_or_else(|| ApiError::bad_request("user_type is required"))?
        .parse()?;

    let token = dummy
        .issue(role, Utc::now())
        .map_err(|e| ApiError::new(realty_core::ErrorKind::Internal, e.to_string()))?;
    Ok(Json(dto::TokenResponse { token }))
}
