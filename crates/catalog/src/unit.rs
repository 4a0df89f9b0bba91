use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use realty_auth::Role;
use realty_core::{BuildingId, FieldError, UnitId};

/// Moderation status of a unit.
///
/// Transitions are caller-directed: any status may be set from any other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Created,
    #[serde(alias = "on moderation")]
    OnModeration,
    Approved,
    Declined,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 4] = [
        UnitStatus::Created,
        UnitStatus::OnModeration,
        UnitStatus::Approved,
        UnitStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Created => "created",
            UnitStatus::OnModeration => "on_moderation",
            UnitStatus::Approved => "approved",
            UnitStatus::Declined => "declined",
        }
    }
}

impl Default for UnitStatus {
    fn default() -> Self {
        UnitStatus::Created
    }
}

impl FromStr for UnitStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "created" => Ok(UnitStatus::Created),
            "on_moderation" | "on moderation" => Ok(UnitStatus::OnModeration),
            "approved" => Ok(UnitStatus::Approved),
            "declined" => Ok(UnitStatus::Declined),
            _ => Err(FieldError::new(
                "status",
                "must be one of created, on_moderation, approved, declined",
            )),
        }
    }
}

impl core::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub building_id: BuildingId,
    pub number: i32,
    pub price: i64,
    pub rooms: i32,
    pub status: UnitStatus,
}

/// Unvalidated creation input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitDraft {
    pub building_id: BuildingId,
    pub number: i32,
    pub price: i64,
    pub rooms: i32,
}

/// Validated creation input. Units always start in [`UnitStatus::Created`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnit {
    pub building_id: BuildingId,
    pub number: i32,
    pub price: i64,
    pub rooms: i32,
}

impl UnitDraft {
    pub fn validate(&self) -> Result<NewUnit, FieldError> {
        if self.number <= 0 {
            return Err(FieldError::new("number", "must be a positive integer"));
        }
        if self.price <= 0 {
            return Err(FieldError::new("price", "must be greater than 0"));
        }
        if self.rooms < 0 {
            return Err(FieldError::new("rooms", "must not be negative"));
        }
        Ok(NewUnit {
            building_id: self.building_id,
            number: self.number,
            price: self.price,
            rooms: self.rooms,
        })
    }
}

/// Result of a status write: the updated unit plus the status it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub unit: Unit,
    pub previous: UnitStatus,
    pub changed_at: DateTime<Utc>,
}

impl StatusChange {
    pub fn became_approved(&self) -> bool {
        self.unit.status == UnitStatus::Approved && self.previous != UnitStatus::Approved
    }
}

/// Which rows a listing may return. Derived from the caller's role after the
/// gate has already admitted them; this never rejects a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Visibility {
    ApprovedOnly,
    All,
}

impl Visibility {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Moderator => Visibility::All,
            Role::Client => Visibility::ApprovedOnly,
        }
    }

    pub fn admits(&self, status: UnitStatus) -> bool {
        match self {
            Visibility::All => true,
            Visibility::ApprovedOnly => status == UnitStatus::Approved,
        }
    }
}
