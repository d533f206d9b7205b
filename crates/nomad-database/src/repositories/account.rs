//! PostgreSQL account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use nomad_core::error::{AppError, ErrorKind};
use nomad_core::result::AppResult;
use nomad_core::traits::CredentialStore;
use nomad_core::types::{AccountId, CreateAccount, INVALID_PASSWORD_HASH, LocalAccount};

use crate::token::new_session_token;

const ACCOUNT_COLUMNS: &str =
    "id, username, password_hash, password_expires, token, created_at, updated_at";

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    password_hash: String,
    password_expires: Option<DateTime<Utc>>,
    token: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for LocalAccount {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            password_expires: row.password_expires,
            token: row.token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Account store backed by the `accounts` table.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for AccountRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<LocalAccount>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1");
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(LocalAccount::from))
            .map_err(|e| {
                AppError::with_source(ErrorKind::LocalStore, "Failed to find account by username", e)
            })
    }

    async fn create_account(&self, account: &CreateAccount) -> AppResult<LocalAccount> {
        let sql = format!(
            "INSERT INTO accounts (username, password_hash, token) VALUES ($1, $2, $3) \
             ON CONFLICT (username) DO NOTHING RETURNING {ACCOUNT_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(&account.username)
            .bind(INVALID_PASSWORD_HASH)
            .bind(new_session_token())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::LocalStore, "Failed to create account", e))?;

        if let Some(row) = inserted {
            debug!(account_id = row.id, username = %row.username, "Account created");
            return Ok(row.into());
        }

        // Lost the insert race; the winner's row is the account.
        debug!(username = %account.username, "Account already exists, reusing");
        self.find_by_username(&account.username)
            .await?
            .ok_or_else(|| {
                AppError::local_store(format!(
                    "Account '{}' conflicted on insert but could not be read back",
                    account.username
                ))
            })
    }

    async fn update_password_hash(
        &self,
        id: AccountId,
        expected: &str,
        new_hash: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET password_hash = $3, updated_at = NOW() \
             WHERE id = $1 AND password_hash = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(new_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::LocalStore, "Failed to update password hash", e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn rotate_session_token(&self, id: AccountId) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE accounts SET token = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(new_session_token())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::LocalStore, "Failed to rotate session token", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::local_store(format!(
                "Account {id} not found while rotating session token"
            )));
        }
        Ok(())
    }
}
