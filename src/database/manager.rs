use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, ConfigError};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::Conflict(db_err.message().to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

impl DatabaseError {
    /// Maps `RowNotFound` onto a 404-style error naming the missing entity.
    pub fn or_not_found(err: sqlx::Error, entity: &str) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound(format!("{} not found", entity)),
            other => other.into(),
        }
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS admins (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        image_url VARCHAR(255) NOT NULL,
        admin_id UUID NOT NULL REFERENCES admins(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS variants (
        id UUID PRIMARY KEY,
        variant_name VARCHAR(255) NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0),
        product_id UUID NOT NULL REFERENCES products(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS products_admin_id_idx ON products (admin_id)",
    "CREATE INDEX IF NOT EXISTS variants_product_id_idx ON variants (product_id)",
];

/// Owns pool construction and schema bootstrap for the catalog database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the connection pool described by the config
    pub async fn connect(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        let url = config.database_url()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect(&url)
            .await?;

        info!("Created database pool for: {}", config.database.name);
        Ok(pool)
    }

    /// Pool that connects on first use. Lets the router be built without a
    /// live database.
    pub fn connect_lazy(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        let url = config.database_url()?;
        Ok(PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect_lazy(&url)?)
    }

    /// Create or update the admins/products/variants tables. Idempotent.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        info!("Database schema ready");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = DatabaseError::or_not_found(sqlx::Error::RowNotFound, "Product");
        match err {
            DatabaseError::NotFound(msg) => assert_eq!(msg, "Product not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_sqlx_errors_pass_through() {
        let err = DatabaseError::or_not_found(sqlx::Error::PoolTimedOut, "Product");
        assert!(matches!(err, DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn schema_creates_tables_in_dependency_order() {
        let position = |table: &str| {
            SCHEMA
                .iter()
                .position(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)))
                .unwrap()
        };
        assert!(position("admins") < position("products"));
        assert!(position("products") < position("variants"));
    }
}
