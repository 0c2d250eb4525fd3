//! Credential Store Core Library
//!
//! Backend-agnostic contract for persisting one encrypted API token per
//! `(user, platform)` pair:
//! - `CredentialStore` trait (typed token API + generic query escape hatch)
//! - `TokenCipher` encryption gateway and the bundled `AesGcmCipher`
//! - `Settings` / `DatabaseConfig` configuration provider
//!
//! No database driver lives here; see `credential-store-app` for the
//! SeaORM-backed implementation.

pub mod config;
pub mod crypto;
pub mod error;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{DatabaseConfig, ServerConfig, Settings};
pub use crypto::{AesGcmCipher, TokenCipher};
pub use error::{CoreError, CoreResult};
pub use traits::CredentialStore;
pub use types::{BackendKind, ScalarKind, ScalarValue};
