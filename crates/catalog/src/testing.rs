//! Test doubles shared by the service tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use realty_core::{BuildingId, StoreError, StoreResult, UnitId};

use crate::building::{Building, NewBuilding};
use crate::ports::{ApprovalNotifier, BuildingRepository, SubscriptionRepository, UnitRepository};
use crate::subscription::{NewSubscription, Subscription};
use crate::unit::{NewUnit, StatusChange, Unit, UnitStatus, Visibility};

#[derive(Default)]
struct Rows {
    buildings: BTreeMap<BuildingId, Building>,
    units: BTreeMap<UnitId, Unit>,
    subscriptions: Vec<Subscription>,
}

/// Everything behind one mutex.
#[derive(Default)]
pub struct FakeCatalog {
    rows: Mutex<Rows>,
}

#[async_trait]
impl BuildingRepository for FakeCatalog {
    async fn insert(&self, building: NewBuilding) -> StoreResult<Building> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let stored = Building {
            id: BuildingId::new(rows.buildings.len() as i64 + 1),
            address: building.address,
            year: building.year,
            developer: building.developer,
            created_at: now,
            updated_at: now,
        };
        rows.buildings.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        Ok(self.rows.lock().unwrap().buildings.get(&id).cloned())
    }
}

#[async_trait]
impl UnitRepository for FakeCatalog {
    async fn insert(&self, unit: NewUnit) -> StoreResult<Unit> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.buildings.contains_key(&unit.building_id) {
            return Err(StoreError::ForeignKeyViolation("units_building_id_fkey".into()));
        }
        if rows
            .units
            .values()
            .any(|u| u.building_id == unit.building_id && u.number == unit.number)
        {
            return Err(StoreError::UniqueViolation("units_building_number_key".into()));
        }
        let stored = Unit {
            id: UnitId::new(rows.units.len() as i64 + 1),
            building_id: unit.building_id,
            number: unit.number,
            price: unit.price,
            rooms: unit.rooms,
            status: UnitStatus::Created,
        };
        rows.units.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn exists(&self, building: BuildingId, number: i32) -> StoreResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .units
            .values()
            .any(|u| u.building_id == building && u.number == number))
    }

    async fn set_status(&self, id: UnitId, status: UnitStatus) -> StoreResult<Option<StatusChange>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.units.get_mut(&id).map(|unit| {
            let previous = std::mem::replace(&mut unit.status, status);
            StatusChange {
                unit: unit.clone(),
                previous,
                changed_at: Utc::now(),
            }
        }))
    }

    async fn list(&self, building: BuildingId, visibility: Visibility) -> StoreResult<Vec<Unit>> {
        let rows = self.rows.lock().unwrap();
        let mut units: Vec<Unit> = rows
            .units
            .values()
            .filter(|u| u.building_id == building && visibility.admits(u.status))
            .cloned()
            .collect();
        units.sort_by_key(|u| (u.number, u.id));
        Ok(units)
    }
}

#[async_trait]
impl SubscriptionRepository for FakeCatalog {
    async fn insert(&self, subscription: NewSubscription) -> StoreResult<Subscription> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.buildings.contains_key(&subscription.building_id) {
            return Err(StoreError::ForeignKeyViolation("subscriptions_building_id_fkey".into()));
        }
        if let Some(existing) = rows
            .subscriptions
            .iter()
            .find(|s| s.building_id == subscription.building_id && s.email == subscription.email)
        {
            return Ok(existing.clone());
        }
        let stored = Subscription {
            building_id: subscription.building_id,
            email: subscription.email,
            created_at: Utc::now(),
        };
        rows.subscriptions.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_building(&self, building: BuildingId) -> StoreResult<Vec<Subscription>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .subscriptions
            .iter()
            .filter(|s| s.building_id == building)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    approved: Mutex<Vec<UnitId>>,
}

impl RecordingNotifier {
    pub fn approved(&self) -> Vec<UnitId> {
        self.approved.lock().unwrap().clone()
    }
}

impl ApprovalNotifier for RecordingNotifier {
    fn unit_approved(&self, unit: &Unit) {
        self.approved.lock().unwrap().push(unit.id);
    }
}
