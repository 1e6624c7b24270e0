// SQL implementation of the BalanceStore trait
//
// Runs on sqlx's `Any` driver so the same code serves MySQL in production and
// SQLite in tests. Amounts are stored as decimal strings, and the SQL sticks to
// what both databases accept (no ON CONFLICT / ON DUPLICATE KEY).

use crate::core::economy::{BackendKind, BalanceStore, Cause, Currency, RawDataWriter, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::{AnyPool, Row};
use std::str::FromStr;
use uuid::Uuid;

pub struct SqlBalanceStore {
    pool: AnyPool,
}

impl SqlBalanceStore {
    /// Connect to `database_url` (e.g. `mysql://...` or `sqlite://...`) and
    /// create the tables if needed.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations to create tables.
    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS economy_balances (
                player_id VARCHAR(36) NOT NULL,
                currency_id VARCHAR(64) NOT NULL,
                amount VARCHAR(64) NOT NULL,
                updated_at VARCHAR(40) NOT NULL,
                PRIMARY KEY (player_id, currency_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Audit trail so migration writes can be told apart from transactions
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS economy_balance_audit (
                player_id VARCHAR(36) NOT NULL,
                currency_id VARCHAR(64) NOT NULL,
                amount VARCHAR(64) NOT NULL,
                cause VARCHAR(128) NOT NULL,
                recorded_at VARCHAR(40) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace one balance, and when a cause is given record it in the audit
    /// table. Both happen in one transaction.
    async fn write_balance(
        &self,
        player_id: Uuid,
        amount: Decimal,
        currency_id: &str,
        cause: Option<&Cause>,
    ) -> Result<(), StoreError> {
        let player_id = player_id.to_string();
        let amount = amount.to_string();
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM economy_balances WHERE player_id = ? AND currency_id = ?")
            .bind(player_id.as_str())
            .bind(currency_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO economy_balances (player_id, currency_id, amount, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(player_id.as_str())
        .bind(currency_id)
        .bind(amount.as_str())
        .bind(now.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if let Some(cause) = cause {
            sqlx::query(
                r#"
                INSERT INTO economy_balance_audit (player_id, currency_id, amount, cause, recorded_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(player_id.as_str())
            .bind(currency_id)
            .bind(amount.as_str())
            .bind(cause.reason.as_str())
            .bind(now.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)
    }
}

#[cfg(test)]
impl SqlBalanceStore {
    /// Causes recorded for a player, oldest first.
    async fn audit_causes(&self, player_id: Uuid) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT cause FROM economy_balance_audit WHERE player_id = ? ORDER BY recorded_at",
        )
        .bind(player_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("cause").map_err(db_error))
            .collect()
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl BalanceStore for SqlBalanceStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Sql
    }

    async fn get_balance(
        &self,
        player_id: Uuid,
        currency: &Currency,
    ) -> Result<Decimal, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT amount
            FROM economy_balances
            WHERE player_id = ? AND currency_id = ?
            "#,
        )
        .bind(player_id.to_string())
        .bind(currency.id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(Decimal::ZERO);
        };

        let amount: String = row.try_get("amount").map_err(db_error)?;
        Decimal::from_str(&amount)
            .map_err(|e| StoreError::InvalidData(format!("stored amount '{amount}': {e}")))
    }

    async fn set_balance(
        &self,
        player_id: Uuid,
        amount: Decimal,
        currency: &Currency,
        cause: &Cause,
    ) -> Result<(), StoreError> {
        self.write_balance(player_id, amount, &currency.id, Some(cause))
            .await
    }

    fn raw_writer(&self) -> Option<&dyn RawDataWriter> {
        Some(self)
    }
}

#[async_trait]
impl RawDataWriter for SqlBalanceStore {
    async fn set_raw_data(
        &self,
        player_id: &str,
        amount: &str,
        currency: &Currency,
    ) -> Result<(), StoreError> {
        let player_id = Uuid::parse_str(player_id)
            .map_err(|e| StoreError::InvalidData(format!("player id '{player_id}': {e}")))?;
        let amount = Decimal::from_str(amount)
            .map_err(|e| StoreError::InvalidData(format!("amount '{amount}': {e}")))?;

        self.write_balance(player_id, amount, &currency.id, None)
            .await
    }
}
