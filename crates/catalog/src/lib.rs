//! `realty-catalog`: buildings, units and approval subscriptions.
//!
//! Services here take already-authorized calls. Role only shapes what a
//! listing returns; rejection by role happens at the gate in front.

pub mod building;
pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod registry;
pub mod subscription;
pub mod unit;

#[cfg(test)]
mod testing;

pub use building::{Building, BuildingDraft, FUTURE_YEAR_MARGIN, MIN_CONSTRUCTION_YEAR, NewBuilding};
pub use error::{CatalogError, CatalogResult};
pub use lifecycle::UnitLifecycle;
pub use ports::{ApprovalNotifier, BuildingRepository, NoopNotifier, SubscriptionRepository, UnitRepository};
pub use registry::BuildingRegistry;
pub use subscription::{NewSubscription, Subscription, SubscriptionRegistry};
pub use unit::{NewUnit, StatusChange, Unit, UnitDraft, UnitStatus, Visibility};
