//! `realty-core`: identifiers and the shared error taxonomy.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod validate;

pub use error::{ErrorKind, FieldError, StoreError, StoreResult};
pub use id::{AccountId, BuildingId, UnitId};
