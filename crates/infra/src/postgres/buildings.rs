use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use realty_catalog::{Building, BuildingRepository, NewBuilding};
use realty_core::{BuildingId, StoreResult};

use super::{PgStore, map_sqlx_error};

fn building_from_row(row: &PgRow) -> Result<Building, sqlx::Error> {
    Ok(Building {
        id: BuildingId::new(row.try_get("id")?),
        address: row.try_get("address")?,
        year: row.try_get("year")?,
        developer: row.try_get("developer")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl BuildingRepository for PgStore {
    #[instrument(skip(self, building), fields(year = building.year), err)]
    async fn insert(&self, building: NewBuilding) -> StoreResult<Building> {
        let row = sqlx::query(
            r#"
            INSERT INTO buildings (address, year, developer)
            VALUES ($1, $2, $3)
            RETURNING id, address, year, developer, created_at, updated_at
            "#,
        )
        .bind(&building.address)
        .bind(building.year)
        .bind(building.developer.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_sqlx_error("insert_building", e))?;

        building_from_row(&row).map_err(|e| map_sqlx_error("insert_building", e))
    }

    #[instrument(skip(self), err)]
    async fn find(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        let row = sqlx::query(
            r#"
            SELECT id, address, year, developer, created_at, updated_at
            FROM buildings
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_sqlx_error("find_building", e))?;

        row.as_ref()
            .map(building_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("find_building", e))
    }
}
