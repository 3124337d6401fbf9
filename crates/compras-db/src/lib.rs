//! Compras Database Layer
//!
//! Persistence for the purchase-order service on SQLite through `sqlx`.
//!
//! # Tables
//!
//! - **gerencias / centros_costos / cuenta_contables**: the reference tree;
//!   `cuenta_contables` also holds the fund (`fondo_cents`) of each partida
//! - **articulos / categoria_compras / proveedores**: flat catalogs
//! - **orden_compras**: append-only purchase orders, denormalized
//!
//! # Repository Pattern
//!
//! Each table family has its own repository. Operations that must share a
//! transaction are exposed as `*_on` functions taking the caller's
//! connection; everything else runs on the pool.

pub mod config;
pub mod error;
pub mod models;
pub mod money;
pub mod repos;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::info;

pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use models::*;
pub use repos::*;

/// Database connection pool
pub struct Database {
    /// SQLite connection pool
    pub pool: SqlitePool,
}

impl Database {
    /// Open the pool described by `config`
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Connecting to SQLite: {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| DbError::Connection(format!("SQLite: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

        if config.is_in_memory() {
            // Closing the last connection would drop the database
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection(format!("SQLite: {}", e)))?;

        info!("Connected to SQLite");

        Ok(Self { pool })
    }

    /// Private in-memory database with migrations applied
    pub async fn in_memory() -> DbResult<Self> {
        let db = Self::connect(&DatabaseConfig::in_memory()).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> DbResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;
        info!("Migrations complete");
        Ok(())
    }

    /// Open a write transaction
    pub async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Health check
    pub async fn health_check(&self) -> DbResult<HealthStatus> {
        let sqlite_ok = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok();

        Ok(HealthStatus {
            sqlite: sqlite_ok,
            healthy: sqlite_ok,
        })
    }

    /// Create repository instances
    pub fn cuenta_contable_repo(&self) -> CuentaContableRepo {
        CuentaContableRepo::new(self.pool.clone())
    }

    pub fn orden_compra_repo(&self) -> OrdenCompraRepo {
        OrdenCompraRepo::new(self.pool.clone())
    }

    pub fn catalog_repo(&self) -> CatalogRepo {
        CatalogRepo::new(self.pool.clone())
    }
}

/// Health status of the database connection
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub sqlite: bool,
    pub healthy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::in_memory().await.unwrap();
        let health = db.health_check().await.unwrap();
        assert!(health.healthy);

        let cuenta = db.cuenta_contable_repo().find_by_partida("76").await.unwrap();
        assert!(cuenta.is_some());
    }
}
