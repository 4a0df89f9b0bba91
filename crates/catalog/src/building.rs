use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use realty_core::{BuildingId, FieldError, validate};

/// Earliest construction year the catalogue accepts.
pub const MIN_CONSTRUCTION_YEAR: i32 = 1800;

/// How far past the current year a planned building may be dated.
pub const FUTURE_YEAR_MARGIN: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub address: String,
    pub year: i32,
    pub developer: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped whenever a unit is registered in the building.
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated creation input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildingDraft {
    pub address: String,
    pub year: i32,
    pub developer: Option<String>,
}

/// Validated creation input; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBuilding {
    pub address: String,
    pub year: i32,
    pub developer: Option<String>,
}

impl BuildingDraft {
    pub fn validate(self, current_year: i32) -> Result<NewBuilding, FieldError> {
        let address = validate::non_empty("address", &self.address)?;

        let max_year = current_year + FUTURE_YEAR_MARGIN;
        if !(MIN_CONSTRUCTION_YEAR..=max_year).contains(&self.year) {
            return Err(FieldError::new(
                "year",
                format!("must be between {MIN_CONSTRUCTION_YEAR} and {max_year}"),
            ));
        }

        let developer = self
            .developer
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewBuilding {
            address,
            year: self.year,
            developer,
        })
    }
}
