use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

pub use operations::*;

pub mod operations;

/// Open the SQLite pool, creating the database file on first start.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    // Test connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    Ok(pool)
}

pub async fn health_check(pool: &SqlitePool) -> Result<bool> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(true)
}
