use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use realty_catalog::{NewSubscription, Subscription, SubscriptionRepository};
use realty_core::{BuildingId, StoreResult};

use super::{PgStore, map_sqlx_error};

fn subscription_from_row(row: &PgRow) -> Result<Subscription, sqlx::Error> {
    Ok(Subscription {
        building_id: BuildingId::new(row.try_get("building_id")?),
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl SubscriptionRepository for PgStore {
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on conflict.
    #[instrument(skip(self, subscription), fields(house_id = %subscription.building_id), err)]
    async fn insert(&self, subscription: NewSubscription) -> StoreResult<Subscription> {
        let row = sqlx::query(
            r#"
            INSERT INTO subscriptions (building_id, email)
            VALUES ($1, $2)
            ON CONFLICT (building_id, email)
            DO UPDATE SET email = EXCLUDED.email
            RETURNING building_id, email, created_at
            "#,
        )
        .bind(subscription.building_id.get())
        .bind(&subscription.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_sqlx_error("insert_subscription", e))?;

        subscription_from_row(&row).map_err(|e| map_sqlx_error("insert_subscription", e))
    }

    #[instrument(skip(self), err)]
    async fn list_for_building(&self, building: BuildingId) -> StoreResult<Vec<Subscription>> {
        let rows = sqlx::query(
            r#"
            SELECT building_id, email, created_at
            FROM subscriptions
            WHERE building_id = $1
            ORDER BY created_at ASC, email ASC
            "#,
        )
        .bind(building.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| map_sqlx_error("list_subscriptions", e))?;

        rows.iter()
            .map(subscription_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("list_subscriptions", e))
    }
}
