#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Backend selection through `CredentialStoreBuilder` and `open_store`.

use std::sync::Arc;

use credential_store_app::{open_store, CredentialStoreBuilder};
use credential_store_core::error::{CoreError, CoreResult};
use credential_store_core::traits::CredentialStore;
use credential_store_core::types::BackendKind;
use credential_store_core::{DatabaseConfig, Settings, TokenCipher};

struct PlainCipher;

impl TokenCipher for PlainCipher {
    fn encrypt(&self, plaintext: &str) -> CoreResult<String> {
        Ok(format!("plain:{plaintext}"))
    }
}

fn settings(toml: &str, data_dir: &std::path::Path) -> Settings {
    Settings::from_toml_str(toml, data_dir).expect("valid test settings")
}

#[tokio::test]
async fn defaults_to_sqlite_in_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let store = open_store(&settings("", tmp.path()), Arc::new(PlainCipher))
        .await
        .unwrap();

    assert_eq!(store.backend(), BackendKind::Sqlite);
    store.set_token("u1", "openai", "abc").await.unwrap();
    assert!(tmp.path().join("artificialintelligence.db").is_file());
}

#[tokio::test]
async fn sqlite_path_is_relative_to_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let toml = r#"
        [database]
        type = "SQLite"

        [database.sqlite]
        path = "data/tokens.db"
    "#;
    let store = open_store(&settings(toml, tmp.path()), Arc::new(PlainCipher))
        .await
        .unwrap();

    assert_eq!(store.backend(), BackendKind::Sqlite);
    assert!(tmp.path().join("data").join("tokens.db").is_file());
    assert!(store.dialect().target().ends_with("tokens.db"));
}

#[tokio::test]
async fn unknown_backend_fails_before_touching_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let toml = r#"
        [database]
        type = "oracle"
    "#;
    let err = open_store(&settings(toml, tmp.path()), Arc::new(PlainCipher))
        .await
        .err()
        .expect("unknown backend must be rejected");

    assert!(matches!(err, CoreError::UnsupportedBackend(_)));
    assert!(err.is_setup_failure());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn builder_requires_cipher() {
    let tmp = tempfile::tempdir().unwrap();
    let err = CredentialStoreBuilder::new()
        .settings(settings("", tmp.path()))
        .build()
        .await
        .err()
        .expect("missing cipher must be rejected");

    assert!(matches!(err, CoreError::ConfigurationError(_)));
}

#[tokio::test]
async fn builder_requires_backend_config() {
    let err = CredentialStoreBuilder::default()
        .cipher(Arc::new(PlainCipher))
        .build()
        .await
        .err()
        .expect("missing config must be rejected");

    assert!(matches!(err, CoreError::ConfigurationError(_)));
}

#[tokio::test]
async fn explicit_database_wins_over_settings() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("explicit.db");
    let toml = r#"
        [database]
        type = "mysql"
    "#;

    let store = CredentialStoreBuilder::new()
        .settings(settings(toml, tmp.path()))
        .database(DatabaseConfig::Sqlite { path: path.clone() })
        .cipher(Arc::new(PlainCipher))
        .build()
        .await
        .unwrap();

    assert_eq!(store.backend(), BackendKind::Sqlite);
    store.set_token("u1", "openai", "abc").await.unwrap();
    assert_eq!(
        store.get_token("u1", "openai").await.unwrap().as_deref(),
        Some("plain:abc")
    );
    assert!(path.is_file());
}

#[tokio::test]
async fn store_is_usable_as_trait_object() {
    let tmp = tempfile::tempdir().unwrap();
    let store: Arc<dyn CredentialStore> = Arc::new(
        CredentialStoreBuilder::new()
            .settings(settings("", tmp.path()))
            .cipher(Arc::new(PlainCipher))
            .build()
            .await
            .unwrap(),
    );

    let consumer = Arc::clone(&store);
    tokio::spawn(async move { consumer.set_token("u1", "gemini", "tok").await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        store.get_token("u1", "gemini").await.unwrap().as_deref(),
        Some("plain:tok")
    );
}
