use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use realty_auth::{Account, AccountRepository, NewAccount, Role};
use realty_core::{AccountId, StoreResult};

use super::{PgStore, map_sqlx_error};

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role: Role = role.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "role".into(),
        source: Box::new(e),
    })?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Account {
        id: AccountId::new(row.try_get("id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role,
        created_at,
    })
}

#[async_trait]
impl AccountRepository for PgStore {
    #[instrument(skip(self, account), fields(role = %account.role), err)]
    async fn insert(&self, account: NewAccount) -> StoreResult<Account> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_sqlx_error("insert_account", e))?;

        account_from_row(&row).map_err(|e| map_sqlx_error("insert_account", e))
    }

    #[instrument(skip(self), err)]
    async fn find(&self, id: AccountId) -> StoreResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_sqlx_error("find_account", e))?;

        row.as_ref()
            .map(account_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("find_account", e))
    }
}

