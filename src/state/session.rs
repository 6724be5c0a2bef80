use std::sync::Arc;

use uuid::Uuid;

use super::store::SessionStore;
use crate::error::Result;

pub const DEFAULT_SESSION_PREFIX: &str = "session";

/// 服务端签发会话时写入的标记 key
pub const ISSUED_KEY: &str = "_issued";

/// 生成新的会话 ID（随机 UUID v4，不可预测）
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// 会话上下文
///
/// 同一客户端的多个请求共享同一个 ID，所有 key 以 `<prefix>:<id>:` 为命名空间。
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    id: String,
    prefix: String,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, id: impl Into<String>) -> Self {
        Self::with_prefix(store, id, DEFAULT_SESSION_PREFIX)
    }

    pub fn with_prefix(
        store: Arc<dyn SessionStore>,
        id: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            id: id.into(),
            prefix: prefix.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn key_with_prefix(&self, key: &str) -> String {
        format!("{}:{}:{key}", self.prefix, self.id)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.store.get(&self.key_with_prefix(key)).await
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<()> {
        self.store
            .set(&self.key_with_prefix(key), value.into())
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(&self.key_with_prefix(key)).await
    }

    /// 读取并删除
    pub async fn take(&self, key: &str) -> Result<Option<String>> {
        self.store.take(&self.key_with_prefix(key)).await
    }

    /// 签发一个新会话并写入签发标记
    pub async fn issue(
        store: Arc<dyn SessionStore>,
        prefix: impl Into<String>,
    ) -> Result<Self> {
        let session = Self::with_prefix(store, new_session_id(), prefix);
        session.set(ISSUED_KEY, "1").await?;
        tracing::debug!(session = %session.id, "session issued");
        Ok(session)
    }

    /// 该 ID 是否由本服务签发过；客户端随意编造的 ID 返回 false
    pub async fn is_issued(&self) -> Result<bool> {
        Ok(self.get(ISSUED_KEY).await?.is_some())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("prefix", &self.prefix)
            .finish()
    }
}
