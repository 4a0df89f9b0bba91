use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use realty_catalog::{Building, BuildingDraft, Unit, UnitDraft, UnitStatus};
use realty_core::{AccountId, BuildingId, UnitId};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct DummyLoginQuery {
    pub user_type: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub user_type: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub id: AccountId,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateHouseRequest {
    pub address: String,
    pub year: i32,
    #[serde(default)]
    pub developer: Option<String>,
}

impl From<CreateHouseRequest> for BuildingDraft {
    fn from(req: CreateHouseRequest) -> Self {
        BuildingDraft {
            address: req.address,
            year: req.year,
            developer: req.developer,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFlatRequest {
    pub house_id: BuildingId,
    pub number: i32,
    pub price: i64,
    pub rooms: i32,
}

impl From<CreateFlatRequest> for UnitDraft {
    fn from(req: CreateFlatRequest) -> Self {
        UnitDraft {
            building_id: req.house_id,
            number: req.number,
            price: req.price,
            rooms: req.rooms,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlatRequest {
    pub id: UnitId,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: AccountId,
}

#[derive(Debug, Serialize)]
pub struct HouseResponse {
    pub id: BuildingId,
    pub address: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Building> for HouseResponse {
    fn from(b: Building) -> Self {
        Self {
            id: b.id,
            address: b.address,
            year: b.year,
            developer: b.developer,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlatResponse {
    pub id: UnitId,
    pub house_id: BuildingId,
    pub number: i32,
    pub price: i64,
    pub rooms: i32,
    pub status: UnitStatus,
}

impl From<Unit> for FlatResponse {
    fn from(u: Unit) -> Self {
        Self {
            id: u.id,
            house_id: u.building_id,
            number: u.number,
            price: u.price,
            rooms: u.rooms,
            status: u.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlatsResponse {
    pub flats: Vec<FlatResponse>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub house_id: BuildingId,
    pub email: String,
}
