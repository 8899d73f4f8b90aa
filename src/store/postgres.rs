//! Postgres-backed account store
//!
//! One row per account in the `accounts` table, keyed by normalized email.
//! `create` relies on `ON CONFLICT DO NOTHING` so registration stays atomic
//! against concurrent requests for the same address.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountStore, StoreError, StoreResult};
use crate::models::Account;

const ALL_COLUMNS: &str = "email, account_id, name, password_hash, is_verified, pending_otp, \
     is_reset_pending, avatar_url, age, gender, streak_count, last_activity_at, created_at";

/// `AccountStore` implementation on top of a SQLx connection pool
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn get(&self, email: &str) -> StoreResult<Option<Account>> {
        let query = format!("SELECT {ALL_COLUMNS} FROM accounts WHERE email = $1");
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn create(&self, account: &Account) -> StoreResult<()> {
        let query = format!(
            "INSERT INTO accounts ({ALL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (email) DO NOTHING"
        );
        let result = sqlx::query(&query)
            .bind(&account.email)
            .bind(account.account_id)
            .bind(&account.name)
            .bind(&account.password_hash)
            .bind(account.is_verified)
            .bind(&account.pending_otp)
            .bind(account.is_reset_pending)
            .bind(&account.avatar_url)
            .bind(account.age)
            .bind(&account.gender)
            .bind(account.streak_count)
            .bind(account.last_activity_at)
            .bind(account.created_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists);
        }
        Ok(())
    }

    async fn put(&self, account: &Account) -> StoreResult<()> {
        // email, account_id and created_at are immutable; everything else is
        // replaced wholesale (last-writer-wins, see DESIGN.md).
        let result = sqlx::query(
            "UPDATE accounts SET \
                 name = $2, password_hash = $3, is_verified = $4, pending_otp = $5, \
                 is_reset_pending = $6, avatar_url = $7, age = $8, gender = $9, \
                 streak_count = $10, last_activity_at = $11 \
             WHERE email = $1",
        )
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(account.is_verified)
        .bind(&account.pending_otp)
        .bind(account.is_reset_pending)
        .bind(&account.avatar_url)
        .bind(account.age)
        .bind(&account.gender)
        .bind(account.streak_count)
        .bind(account.last_activity_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
