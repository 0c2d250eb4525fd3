//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::crypto::TokenCipher;
use crate::error::{CoreError, CoreResult};
use crate::traits::CredentialStore;
use crate::types::{BackendKind, ScalarKind, ScalarValue};

// ===== ReverseCipher =====

/// Deterministic stand-in for the encryption gateway: `"abc"` → `"enc:cba"`.
pub struct ReverseCipher;

impl TokenCipher for ReverseCipher {
    fn encrypt(&self, plaintext: &str) -> CoreResult<String> {
        Ok(format!("enc:{}", plaintext.chars().rev().collect::<String>()))
    }
}

// ===== MockCredentialStore =====

/// In-memory store keyed by `(user_id, platform)`.
///
/// `get_scalar_value` answers from a canned value and counts how often the
/// "database" was actually hit.
pub struct MockCredentialStore {
    tokens: RwLock<HashMap<(String, String), String>>,
    scalar: RwLock<Option<ScalarValue>>,
    query_count: AtomicUsize,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            scalar: RwLock::new(None),
            query_count: AtomicUsize::new(0),
        }
    }

    pub async fn set_scalar(&self, value: Option<ScalarValue>) {
        *self.scalar.write().await = value;
    }

    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn set_token(&self, user_id: &str, platform: &str, token: &str) -> CoreResult<()> {
        let ciphertext = ReverseCipher.encrypt(token)?;
        self.tokens
            .write()
            .await
            .insert((user_id.to_string(), platform.to_string()), ciphertext);
        Ok(())
    }

    async fn get_token(&self, user_id: &str, platform: &str) -> CoreResult<Option<String>> {
        Ok(self
            .tokens
            .read()
            .await
            .get(&(user_id.to_string(), platform.to_string()))
            .cloned())
    }

    async fn execute_statement(&self, sql: &str) -> CoreResult<()> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if sql.trim().is_empty() {
            return Err(CoreError::QueryError("empty statement".to_string()));
        }
        Ok(())
    }

    async fn get_scalar_value(
        &self,
        _sql: &str,
        kind: ScalarKind,
    ) -> CoreResult<Option<ScalarValue>> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        match self.scalar.read().await.clone() {
            Some(value) if value.kind() != kind => Err(CoreError::QueryError(format!(
                "column is {}, requested {kind}",
                value.kind()
            ))),
            other => Ok(other),
        }
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Sqlite
    }
}
