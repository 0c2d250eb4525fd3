//! 凭证存储抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{BackendKind, ScalarKind, ScalarValue};

/// 凭证存储 Trait
///
/// One canonical encrypted token per `(user_id, platform)`. Every backend
/// implements this identically; callers never learn which one is active
/// unless they ask via [`CredentialStore::backend`].
///
/// Runtime failures are logged by the implementation and also returned as
/// `CoreError::QueryError`, so a caller may ignore them (`.ok()`) or handle
/// them strictly.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 加密并写入凭证（按 `(user_id, platform)` 原子 upsert）
    ///
    /// # Arguments
    /// * `user_id` - 用户 ID（不做格式校验）
    /// * `platform` - 平台标识（区分大小写）
    /// * `token` - 明文 token，写入前经 `TokenCipher::encrypt` 加密
    async fn set_token(&self, user_id: &str, platform: &str, token: &str) -> CoreResult<()>;

    /// 获取凭证密文
    ///
    /// # Returns
    /// * `Ok(Some(ciphertext))` - 凭证存在（原样返回，不解密）
    /// * `Ok(None)` - 凭证不存在
    async fn get_token(&self, user_id: &str, platform: &str) -> CoreResult<Option<String>>;

    /// 在同一连接上执行任意语句
    async fn execute_statement(&self, sql: &str) -> CoreResult<()>;

    /// 读取首行首列的标量值
    ///
    /// # Returns
    /// * `Ok(Some(value))` - 读取成功
    /// * `Ok(None)` - 查询无结果或值为 `NULL`
    async fn get_scalar_value(&self, sql: &str, kind: ScalarKind)
        -> CoreResult<Option<ScalarValue>>;

    /// Like [`get_scalar_value`](Self::get_scalar_value) but takes a type tag
    /// such as `"int64"`.
    ///
    /// An unknown tag fails with `CoreError::UnsupportedType` before any SQL runs.
    async fn get_scalar_value_as(
        &self,
        sql: &str,
        type_name: &str,
    ) -> CoreResult<Option<ScalarValue>> {
        let kind: ScalarKind = type_name.parse()?;
        self.get_scalar_value(sql, kind).await
    }

    /// 当前使用的数据库后端
    fn backend(&self) -> BackendKind;
}
