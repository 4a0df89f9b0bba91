use std::sync::Arc;

use axum::{Json, extract::Extension};

use realty_catalog::UnitStatus;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::{ApiJson, dto};
use crate::context::PrincipalContext;

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::CreateFlatRequest>,
) -> Result<Json<dto::FlatResponse>, ApiError> {
    let unit = services.units.create(body.into()).await?;
    Ok(Json(unit.into()))
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::UpdateFlatRequest>,
) -> Result<Json<dto::FlatResponse>, ApiError> {
    let status: UnitStatus = body.status.parse()?;
    tracing::info!(moderator_id = %principal.account_id(), flat_id = %body.id, %status, "status change requested");
    let unit = services.units.set_status(body.id, status).await?;
    Ok(Json(unit.into()))
}
