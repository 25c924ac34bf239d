//! 用户库连接与迁移
//! 连接失败和迁移失败统一映射到 AppError

use crate::{config::DatabaseConfig, error::AppError};
use secrecy::ExposeSecret;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::{str::FromStr, time::Duration};

/// 连接用户库并执行迁移
///
/// 每次存储调用都受 `store_timeout` 约束，获取连接的等待时间不超过它。
pub async fn connect_user_db(
    config: &DatabaseConfig,
    store_timeout: Duration,
) -> Result<PgPool, AppError> {
    // 解析失败属于配置错误，错误信息中不带 URL
    let options = PgConnectOptions::from_str(config.url.expose_secret()).map_err(|e| {
        tracing::error!("Invalid database URL");
        AppError::Config(format!("Invalid database URL: {}", e))
    })?;

    let acquire_timeout = acquire_timeout(config, store_timeout);

    tracing::debug!(
        acquire_timeout_ms = acquire_timeout.as_millis() as u64,
        "Creating user database pool..."
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(acquire_timeout)
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_with(options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to user database: {}", e);
            AppError::Database(e)
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "User database pool created"
    );

    run_migrations(&pool).await?;

    Ok(pool)
}

/// 执行 users 表迁移
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    tracing::info!("Running user database migrations...");

    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        tracing::error!("Migration failed: {}", e);
        AppError::Database(e.into())
    })?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// 连接获取超时取配置值与存储超时中较小者
fn acquire_timeout(config: &DatabaseConfig, store_timeout: Duration) -> Duration {
    Duration::from_secs(config.acquire_timeout_secs).min(store_timeout)
}
