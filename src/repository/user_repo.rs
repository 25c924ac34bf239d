//! User repository (数据库访问层)

use crate::{
    config::DatabaseConfig,
    db,
    error::AppError,
    models::user::{NewUser, UserRecord},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;

/// Account storage used by the authentication core
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by its unique username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError>;

    /// Insert a new account; `IdentifierTaken` if the username exists
    async fn insert(&self, user: NewUser) -> Result<UserRecord, AppError>;

    /// Replace nickname and password hash
    async fn update_profile(
        &self,
        username: &str,
        nickname: &str,
        password_hash: &str,
    ) -> Result<Option<UserRecord>, AppError>;

    /// Delete an account, returns whether a row was removed
    async fn delete(&self, username: &str) -> Result<bool, AppError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    user_role: String,
    nickname: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role: row.user_role.parse()?,
            nickname: row.nickname,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed store
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Connect to the user database and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig, store_timeout: Duration) -> Result<Self, AppError> {
        let pool = db::connect_user_db(config, store_timeout).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, AppError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, user_role, nickname)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.nickname)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(row) => row.try_into(),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::IdentifierTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_profile(
        &self,
        username: &str,
        nickname: &str,
        password_hash: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                nickname = $2,
                password_hash = $3,
                updated_at = NOW()
            WHERE username = $1
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(nickname)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn delete(&self, username: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
