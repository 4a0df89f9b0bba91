use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
};

use realty_core::BuildingId;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::{ApiJson, dto};
use crate::context::PrincipalContext;

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::CreateHouseRequest>,
) -> Result<Json<dto::HouseResponse>, ApiError> {
    let building = services.buildings.create(body.into()).await?;
    Ok(Json(building.into()))
}

pub async fn list_flats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Json<dto::FlatsResponse>, ApiError> {
    let house: BuildingId = id.parse()?;
    tracing::debug!(account_id = %principal.account_id(), house_id = %house, "listing flats");
    let units = services.units.list_for_role(house, principal.role()).await?;
    Ok(Json(dto::FlatsResponse {
        flats: units.into_iter().map(Into::into).collect(),
    }))
}

pub async fn subscribe(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::SubscribeRequest>,
) -> Result<Json<dto::SubscribeResponse>, ApiError> {
    let house: BuildingId = id.parse()?;
    tracing::info!(account_id = %principal.account_id(), house_id = %house, "subscribe requested");
    let subscription = services.subscriptions.subscribe(house, &body.email).await?;
    Ok(Json(dto::SubscribeResponse {
        house_id: subscription.building_id,
        email: subscription.email,
    }))
}
