use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use realty_catalog::{NewUnit, StatusChange, Unit, UnitRepository, UnitStatus, Visibility};
use realty_core::{BuildingId, StoreResult, UnitId};

use super::{PgStore, map_sqlx_error};

fn status_column(row: &PgRow, column: &str) -> Result<UnitStatus, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn unit_from_row(row: &PgRow) -> Result<Unit, sqlx::Error> {
    Ok(Unit {
        id: UnitId::new(row.try_get("id")?),
        building_id: BuildingId::new(row.try_get("building_id")?),
        number: row.try_get("number")?,
        price: row.try_get("price")?,
        rooms: row.try_get("rooms")?,
        status: status_column(row, "status")?,
    })
}

fn status_change_from_row(row: &PgRow) -> Result<StatusChange, sqlx::Error> {
    Ok(StatusChange {
        unit: unit_from_row(row)?,
        previous: status_column(row, "previous_status")?,
        changed_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UnitRepository for PgStore {
    /// Insert and bump the parent's `updated_at` in one transaction. The unique
    /// index and the foreign key decide duplicates and missing parents.
    #[instrument(skip(self, unit), fields(house_id = %unit.building_id, number = unit.number), err)]
    async fn insert(&self, unit: NewUnit) -> StoreResult<Unit> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_unit", e))?;

        let row = sqlx::query(
            r#"
            INSERT INTO units (building_id, number, price, rooms, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, building_id, number, price, rooms, status
            "#,
        )
        .bind(unit.building_id.get())
        .bind(unit.number)
        .bind(unit.price)
        .bind(unit.rooms)
        .bind(UnitStatus::Created.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_unit", e))?;

        sqlx::query("UPDATE buildings SET updated_at = NOW() WHERE id = $1")
            .bind(unit.building_id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("touch_building", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_unit", e))?;

        unit_from_row(&row).map_err(|e| map_sqlx_error("insert_unit", e))
    }

    #[instrument(skip(self), err)]
    async fn exists(&self, building: BuildingId, number: i32) -> StoreResult<bool> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM units WHERE building_id = $1 AND number = $2) AS present",
        )
        .bind(building.get())
        .bind(number)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_sqlx_error("unit_exists", e))?;

        row.try_get("present")
            .map_err(|e| map_sqlx_error("unit_exists", e))
    }

    /// The row lock in `previous` serialises concurrent moderators, so exactly
    /// one of them observes the transition into `approved`.
    #[instrument(skip(self), fields(status = %status), err)]
    async fn set_status(&self, id: UnitId, status: UnitStatus) -> StoreResult<Option<StatusChange>> {
        let row = sqlx::query(
            r#"
            WITH previous AS (
                SELECT id, status FROM units WHERE id = $1 FOR UPDATE
            )
            UPDATE units AS u
            SET status = $2, updated_at = NOW()
            FROM previous
            WHERE u.id = previous.id
            RETURNING u.id, u.building_id, u.number, u.price, u.rooms, u.status,
                      previous.status AS previous_status, u.updated_at
            "#,
        )
        .bind(id.get())
        .bind(status.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_sqlx_error("set_unit_status", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let change =
            status_change_from_row(&row).map_err(|e| map_sqlx_error("set_unit_status", e))?;
        Ok(Some(change))
    }

    #[instrument(skip(self), err)]
    async fn list(&self, building: BuildingId, visibility: Visibility) -> StoreResult<Vec<Unit>> {
        let approved_only = matches!(visibility, Visibility::ApprovedOnly);
        let rows = sqlx::query(
            r#"
            SELECT id, building_id, number, price, rooms, status
            FROM units
            WHERE building_id = $1
              AND (NOT $2 OR status = $3)
            ORDER BY number ASC, id ASC
            "#,
        )
        .bind(building.get())
        .bind(approved_only)
        .bind(UnitStatus::Approved.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_sqlx_error("list_units", e))?;

        rows.iter()
            .map(unit_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("list_units", e))
    }
}
