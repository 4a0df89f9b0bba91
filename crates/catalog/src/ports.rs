//! Persistence and notification ports for the catalogue.
//!
//! Implementations live in `realty-infra`. Each port method is a single
//! atomic operation against the store; services never compose a read and a
//! write to enforce a uniqueness or existence rule.

use async_trait::async_trait;

use realty_core::{BuildingId, StoreResult, UnitId};

use crate::building::{Building, NewBuilding};
use crate::subscription::{NewSubscription, Subscription};
use crate::unit::{NewUnit, StatusChange, Unit, UnitStatus, Visibility};

#[async_trait]
pub trait BuildingRepository: Send + Sync {
    async fn insert(&self, building: NewBuilding) -> StoreResult<Building>;

    async fn find(&self, id: BuildingId) -> StoreResult<Option<Building>>;
}

#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Insert a unit in `created` status and bump the parent building's
    /// `updated_at` in the same write.
    ///
    /// - duplicate `(building_id, number)` -> `StoreError::UniqueViolation`
    /// - missing building -> `StoreError::ForeignKeyViolation`
    async fn insert(&self, unit: NewUnit) -> StoreResult<Unit>;

    async fn exists(&self, building: BuildingId, number: i32) -> StoreResult<bool>;

    /// Overwrite the status, returning the new row and the status it replaced.
    /// `Ok(None)` when no such unit exists.
    async fn set_status(&self, id: UnitId, status: UnitStatus) -> StoreResult<Option<StatusChange>>;

    /// Units of one building ordered by `number`, then `id`.
    async fn list(&self, building: BuildingId, visibility: Visibility) -> StoreResult<Vec<Unit>>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Idempotent: re-subscribing the same address returns the existing row.
    /// Missing building -> `StoreError::ForeignKeyViolation`.
    async fn insert(&self, subscription: NewSubscription) -> StoreResult<Subscription>;

    async fn list_for_building(&self, building: BuildingId) -> StoreResult<Vec<Subscription>>;
}

/// Receives units that just entered `approved`.
///
/// Must not block: the caller is inside a request.
pub trait ApprovalNotifier: Send + Sync {
    fn unit_approved(&self, unit: &Unit);
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ApprovalNotifier for NoopNotifier {
    fn unit_approved(&self, _unit: &Unit) {}
}
