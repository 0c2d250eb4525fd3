//! `CredentialStore` implementation for `SqlCredentialStore`.
//!
//! Tokens are encrypted with the injected `TokenCipher` before storage and
//! returned as ciphertext; nothing here decrypts.

use std::fmt::Display;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter,
    Statement,
};

use credential_store_core::error::{CoreError, CoreResult};
use credential_store_core::traits::CredentialStore;
use credential_store_core::types::{BackendKind, ScalarKind, ScalarValue};

use super::entity::credential;
use super::scalar::Cell;
use super::SqlCredentialStore;

impl SqlCredentialStore {
    /// Log a failed runtime statement and turn it into `CoreError::QueryError`.
    fn query_failed(&self, operation: &str, err: &impl Display) -> CoreError {
        log::warn!("{} {operation} failed: {err}", self.dialect.kind());
        CoreError::QueryError(format!("{operation} failed: {err}"))
    }
}

#[async_trait]
impl CredentialStore for SqlCredentialStore {
    async fn set_token(&self, user_id: &str, platform: &str, token: &str) -> CoreResult<()> {
        let ciphertext = self.cipher.encrypt(token).map_err(|e| {
            log::error!("Failed to encrypt token for {user_id} on {platform}: {e}");
            e
        })?;

        let active_model = credential::ActiveModel {
            user_id: Set(user_id.to_string()),
            platform: Set(platform.to_string()),
            secret_ciphertext: Set(ciphertext),
            ..Default::default()
        };

        // Single statement; the unique index arbitrates concurrent writers.
        credential::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([credential::Column::UserId, credential::Column::Platform])
                    .update_column(credential::Column::SecretCiphertext)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| self.query_failed("setToken", &e))?;

        log::info!("Token saved for {user_id} on {platform}");
        Ok(())
    }

    async fn get_token(&self, user_id: &str, platform: &str) -> CoreResult<Option<String>> {
        let row = credential::Entity::find()
            .filter(credential::Column::UserId.eq(user_id))
            .filter(credential::Column::Platform.eq(platform))
            .one(&self.db)
            .await
            .map_err(|e| self.query_failed("getToken", &e))?;

        Ok(row.map(|r| r.secret_ciphertext))
    }

    async fn execute_statement(&self, sql: &str) -> CoreResult<()> {
        self.db
            .execute_unprepared(sql)
            .await
            .map_err(|e| self.query_failed("executeStatement", &e))?;
        Ok(())
    }

    async fn get_scalar_value(
        &self,
        sql: &str,
        kind: ScalarKind,
    ) -> CoreResult<Option<ScalarValue>> {
        let statement = Statement::from_string(self.dialect.database_backend(), sql);
        let cell = Cell::find_by_statement(statement)
            .one(&self.db)
            .await
            .map_err(|e| self.query_failed("getScalarValue", &e))?;

        // Zero rows and SQL NULL both read as absent.
        cell.map_or(Ok(None), |cell| cell.into_scalar(kind))
            .map_err(|reason| self.query_failed("getScalarValue", &reason))
    }

    fn backend(&self) -> BackendKind {
        self.dialect.kind()
    }
}
