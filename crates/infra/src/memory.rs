//! In-memory repositories for tests and dev.
//!
//! All tables sit behind a single `RwLock`, so every repository call is one
//! critical section: uniqueness checks and inserts cannot interleave.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use realty_auth::{Account, AccountRepository, NewAccount};
use realty_catalog::{
    Building, BuildingRepository, NewBuilding, NewSubscription, NewUnit, StatusChange,
    Subscription, SubscriptionRepository, Unit, UnitRepository, UnitStatus, Visibility,
};
use realty_core::{AccountId, BuildingId, StoreError, StoreResult, UnitId};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    buildings: BTreeMap<BuildingId, Building>,
    units: BTreeMap<UnitId, Unit>,
    subscriptions: BTreeMap<(BuildingId, String), Subscription>,
    next_account: i64,
    next_building: i64,
    next_unit: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| StoreError::unavailable("in-memory store lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| StoreError::unavailable("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert(&self, account: NewAccount) -> StoreResult<Account> {
        let mut tables = self.write()?;
        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::UniqueViolation("accounts_email_key".into()));
        }
        let stored = Account {
            id: AccountId::new(next_id(&mut tables.next_account)),
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: Utc::now(),
        };
        tables.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }
}

#[async_trait]
impl BuildingRepository for InMemoryStore {
    async fn insert(&self, building: NewBuilding) -> StoreResult<Building> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let stored = Building {
            id: BuildingId::new(next_id(&mut tables.next_building)),
            address: building.address,
            year: building.year,
            developer: building.developer,
            created_at: now,
            updated_at: now,
        };
        tables.buildings.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        Ok(self.read()?.buildings.get(&id).cloned())
    }
}

#[async_trait]
impl UnitRepository for InMemoryStore {
    async fn insert(&self, unit: NewUnit) -> StoreResult<Unit> {
        let mut tables = self.write()?;
        if !tables.buildings.contains_key(&unit.building_id) {
            return Err(StoreError::ForeignKeyViolation("units_building_id_fkey".into()));
        }
        if tables
            .units
            .values()
            .any(|u| u.building_id == unit.building_id && u.number == unit.number)
        {
            return Err(StoreError::UniqueViolation("units_building_number_key".into()));
        }

        let stored = Unit {
            id: UnitId::new(next_id(&mut tables.next_unit)),
            building_id: unit.building_id,
            number: unit.number,
            price: unit.price,
            rooms: unit.rooms,
            status: UnitStatus::Created,
        };
        tables.units.insert(stored.id, stored.clone());
        if let Some(parent) = tables.buildings.get_mut(&unit.building_id) {
            parent.updated_at = Utc::now();
        }
        Ok(stored)
    }

    async fn exists(&self, building: BuildingId, number: i32) -> StoreResult<bool> {
        Ok(self
            .read()?
            .units
            .values()
            .any(|u| u.building_id == building && u.number == number))
    }

    async fn set_status(&self, id: UnitId, status: UnitStatus) -> StoreResult<Option<StatusChange>> {
        let mut tables = self.write()?;
        Ok(tables.units.get_mut(&id).map(|unit| {
            let previous = std::mem::replace(&mut unit.status, status);
            StatusChange {
                unit: unit.clone(),
                previous,
                changed_at: Utc::now(),
            }
        }))
    }

    async fn list(&self, building: BuildingId, visibility: Visibility) -> StoreResult<Vec<Unit>> {
        let tables = self.read()?;
        let mut units: Vec<Unit> = tables
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
impl SubscriptionRepository for InMemoryStore {
    async fn insert(&self, subscription: NewSubscription) -> StoreResult<Subscription> {
        let mut tables = self.write()?;
        if !tables.buildings.contains_key(&subscription.building_id) {
            return Err(StoreError::ForeignKeyViolation(
                "subscriptions_building_id_fkey".into(),
            ));
        }
        let key = (subscription.building_id, subscription.email.clone());
        let stored = tables
            .subscriptions
            .entry(key)
            .or_insert_with(|| Subscription {
                building_id: subscription.building_id,
                email: subscription.email,
                created_at: Utc::now(),
            });
        Ok(stored.clone())
    }

    async fn list_for_building(&self, building: BuildingId) -> StoreResult<Vec<Subscription>> {
        let tables = self.read()?;
        let mut subs: Vec<Subscription> = tables
            .subscriptions
            .values()
            .filter(|s| s.building_id == building)
            .cloned()
            .collect();
        subs.sort_by(|a, b| (a.created_at, &a.email).cmp(&(b.created_at, &b.email)));
        Ok(subs)
    }
}
