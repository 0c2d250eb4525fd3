//! SQL-backed credential store using `SeaORM`.
//!
//! A single `SqlCredentialStore` serves SQLite, MySQL and PostgreSQL; the
//! differences are carried by its [`Dialect`]. Tokens are encrypted through
//! the injected `TokenCipher` before they reach the database.

mod credential_store;
mod dialect;
pub(crate) mod entity;
mod migration;
mod scalar;

use std::path::Path;
use std::sync::Arc;

use credential_store_core::error::{CoreError, CoreResult};
use credential_store_core::{DatabaseConfig, TokenCipher};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub use dialect::Dialect;
use migration::Migrator;

/// Credential store over one long-lived database connection.
///
/// The pool underneath is capped at a single connection. It is re-tested
/// before each use, so a client/server backend reconnects after a dropped
/// link instead of failing permanently.
pub struct SqlCredentialStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
    pub(crate) dialect: Dialect,
    pub(crate) cipher: Arc<dyn TokenCipher>,
}

impl SqlCredentialStore {
    /// Open the configured backend and make sure the `credentials` table exists.
    ///
    /// Safe to call repeatedly against the same database. Applied migrations
    /// are recorded in SeaORM's `seaql_migrations` table next to `credentials`.
    ///
    /// # Errors
    /// - `CoreError::ConnectionError` if the directory cannot be created or the
    ///   backend cannot be reached.
    /// - `CoreError::SchemaError` if schema creation fails.
    pub async fn connect(config: &DatabaseConfig, cipher: Arc<dyn TokenCipher>) -> CoreResult<Self> {
        let dialect = Dialect::from_config(config);
        dialect.prepare_target()?;

        let mut options = ConnectOptions::new(dialect.connection_url().to_owned());
        options
            .max_connections(1)
            .min_connections(1)
            .test_before_acquire(true)
            .sqlx_logging(false);
        if let Some(path) = dialect.sqlite_path().map(Path::to_path_buf) {
            // Applied to every pooled connection, including replacements.
            options.map_sqlx_sqlite_opts(move |opts| {
                opts.filename(&path)
                    .create_if_missing(true)
                    .foreign_keys(true)
            });
        }

        let db = Database::connect(options).await.map_err(|e| {
            log::error!("Failed to connect to {}: {e}", dialect.target());
            CoreError::ConnectionError(format!("Failed to connect to {}: {e}", dialect.target()))
        })?;

        // Ensure schema is up to date before the store is used.
        Migrator::up(&db, None)
            .await
            .map_err(|e| CoreError::SchemaError(format!("Failed to create credentials table: {e}")))?;

        log::info!("Credential store ready ({})", dialect.target());
        Ok(Self {
            db,
            dialect,
            cipher,
        })
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }
}
