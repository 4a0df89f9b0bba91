use std::sync::Arc;

use realty_auth::Role;
use realty_core::{BuildingId, StoreError, UnitId};

use crate::error::{CatalogError, CatalogResult};
use crate::ports::{ApprovalNotifier, BuildingRepository, UnitRepository};
use crate::unit::{Unit, UnitDraft, UnitStatus, Visibility};

/// Unit creation, moderation and role-filtered listing.
#[derive(Clone)]
pub struct UnitLifecycle {
    buildings: Arc<dyn BuildingRepository>,
    units: Arc<dyn UnitRepository>,
    notifier: Arc<dyn ApprovalNotifier>,
}

impl UnitLifecycle {
    pub fn new(
        buildings: Arc<dyn BuildingRepository>,
        units: Arc<dyn UnitRepository>,
        notifier: Arc<dyn ApprovalNotifier>,
    ) -> Self {
        Self {
            buildings,
            units,
            notifier,
        }
    }

    /// Register a unit in `created` status.
    ///
    /// Precedence: missing building, then duplicate number, then field validation.
    pub async fn create(&self, draft: UnitDraft) -> CatalogResult<Unit> {
        let building = draft.building_id;
        if self.buildings.find(building).await?.is_none() {
            return Err(CatalogError::BuildingNotFound(building));
        }

        let new_unit = match draft.validate() {
            Ok(u) => u,
            Err(field) => {
                if self.units.exists(building, draft.number).await? {
                    return Err(duplicate(building, draft.number));
                }
                return Err(field.into());
            }
        };

        let unit = self
            .units
            .insert(new_unit)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => duplicate(building, draft.number),
                StoreError::ForeignKeyViolation(_) => CatalogError::BuildingNotFound(building),
                other => CatalogError::Store(other),
            })?;

        tracing::info!(flat_id = %unit.id, house_id = %building, number = unit.number, "flat created");
        Ok(unit)
    }

    /// Overwrite the status. Setting the current status again is a no-op write
    /// that still succeeds; only entry into `approved` notifies subscribers.
    pub async fn set_status(&self, id: UnitId, status: UnitStatus) -> CatalogResult<Unit> {
        let change = self
            .units
            .set_status(id, status)
            .await?
            .ok_or(CatalogError::UnitNotFound(id))?;

        tracing::info!(
            flat_id = %id,
            from = %change.previous,
            to = %change.unit.status,
            at = %change.changed_at,
            "flat status updated"
        );

        if change.became_approved() {
            self.notifier.unit_approved(&change.unit);
        }
        Ok(change.unit)
    }

    /// Units of a building as seen by `role`. An unknown building lists as empty.
    pub async fn list_for_role(&self, building: BuildingId, role: Role) -> CatalogResult<Vec<Unit>> {
        Ok(self.units.list(building, Visibility::for_role(role)).await?)
    }
}

fn duplicate(building: BuildingId, number: i32) -> CatalogError {
    CatalogError::DuplicateUnit { building, number }
}
