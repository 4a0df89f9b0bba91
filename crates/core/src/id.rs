//! Strongly-typed identifiers used across the domain.
//!
//! All identifiers are database-assigned serial numbers. They are never
//! minted by the application except for the synthetic bootstrap subject.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Identifier of a registered account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

/// Identifier of a building.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(i64);

/// Identifier of a unit (flat) inside a building.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(i64);

macro_rules! impl_serial_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| FieldError::new($name, "must be an integer"))?;
                Ok(Self(value))
            }
        }
    };
}

impl_serial_newtype!(AccountId, "account_id");
impl_serial_newtype!(BuildingId, "house_id");
impl_serial_newtype!(UnitId, "flat_id");
