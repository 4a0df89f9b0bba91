use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use realty_core::{BuildingId, StoreError, validate};

use crate::error::{CatalogError, CatalogResult};
use crate::ports::{BuildingRepository, SubscriptionRepository};

/// An email address that wants to hear about approvals in one building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub building_id: BuildingId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub building_id: BuildingId,
    pub email: String,
}

#[derive(Clone)]
pub struct SubscriptionRegistry {
    buildings: Arc<dyn BuildingRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionRegistry {
    pub fn new(
        buildings: Arc<dyn BuildingRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            buildings,
            subscriptions,
        }
    }

    pub async fn subscribe(&self, building: BuildingId, email: &str) -> CatalogResult<Subscription> {
        let email = validate::email("email", email)?;

        if self.buildings.find(building).await?.is_none() {
            return Err(CatalogError::BuildingNotFound(building));
        }

        let subscription = self
            .subscriptions
            .insert(NewSubscription {
                building_id: building,
                email,
            })
            .await
            .map_err(|e| match e {
                StoreError::ForeignKeyViolation(_) => CatalogError::BuildingNotFound(building),
                other => CatalogError::Store(other),
            })?;

        tracing::info!(house_id = %building, "subscription recorded");
        Ok(subscription)
    }

    pub async fn subscribers(&self, building: BuildingId) -> CatalogResult<Vec<Subscription>> {
        Ok(self.subscriptions.list_for_building(building).await?)
    }
}
