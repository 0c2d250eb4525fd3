//! Credential store bootstrap.
//!
//! Provides `CredentialStoreBuilder` (backend selection + cipher injection)
//! and `open_store`, the one-call form used by hosts that already hold their
//! `Settings`.
//!
//! The host constructs exactly one store at startup and hands it (or an
//! `Arc<dyn CredentialStore>`) to every consumer; there is no global instance.

pub mod adapters;

use std::sync::Arc;

use credential_store_core::error::{CoreError, CoreResult};
use credential_store_core::{DatabaseConfig, Settings, TokenCipher};

pub use adapters::{Dialect, SqlCredentialStore};

/// Builder for constructing a connected `SqlCredentialStore`.
///
/// # Required
/// - `cipher`: the encryption gateway applied to every token
/// - `settings` or `database`: which backend to open
///
/// An explicit `database` config wins over `settings`.
pub struct CredentialStoreBuilder {
    settings: Option<Settings>,
    database: Option<DatabaseConfig>,
    cipher: Option<Arc<dyn TokenCipher>>,
}

impl CredentialStoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: None,
            database: None,
            cipher: None,
        }
    }

    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn database(mut self, database: DatabaseConfig) -> Self {
        self.database = Some(database);
        self
    }

    #[must_use]
    pub fn cipher(mut self, cipher: Arc<dyn TokenCipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Resolve the backend and connect.
    ///
    /// # Errors
    /// - `CoreError::ConfigurationError` if a required piece is missing.
    /// - `CoreError::UnsupportedBackend` if `database.type` is unknown.
    /// - Any setup error from `SqlCredentialStore::connect`.
    pub async fn build(self) -> CoreResult<SqlCredentialStore> {
        let cipher = self
            .cipher
            .ok_or_else(|| CoreError::ConfigurationError("cipher is required".to_string()))?;
        let database = match (self.database, self.settings) {
            (Some(database), _) => database,
            (None, Some(settings)) => DatabaseConfig::from_settings(&settings)?,
            (None, None) => {
                return Err(CoreError::ConfigurationError(
                    "settings or database config is required".to_string(),
                ))
            }
        };

        log::info!("Opening {} credential store", database.backend());
        SqlCredentialStore::connect(&database, cipher).await
    }
}

impl Default for CredentialStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Select the backend named by `database.type` and open it.
pub async fn open_store(
    settings: &Settings,
    cipher: Arc<dyn TokenCipher>,
) -> CoreResult<SqlCredentialStore> {
    let database = DatabaseConfig::from_settings(settings)?;
    SqlCredentialStore::connect(&database, cipher).await
}
