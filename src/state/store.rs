use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;

/// 会话存储 trait
///
/// 后端可以在多个请求之间共享，读写删除被视为原子操作。
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;

    /// 读取并删除；flash 槽位依赖它保证只被消费一次
    ///
    /// 默认实现是先读后删，两步之间不加锁；能原子完成的后端应当覆盖。
    async fn take(&self, key: &str) -> Result<Option<String>> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.delete(key).await?;
        }
        Ok(value)
    }
}

/// 内存存储实现，单进程内的会话共享一张表
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// 以 `prefix` 开头的 key，已排序；用于查看某个会话留下了什么
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .inner
            .read()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.inner.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.write().remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.write().remove(key))
    }
}

#[cfg(feature = "redis-store")]
pub mod redis {
    use super::*;
    use crate::error::FlashKitError;
    use redis::AsyncCommands;

    /// Redis 存储实现，适合多实例部署共享会话
    pub struct RedisStore {
        client: redis::Client,
    }

    impl RedisStore {
        pub fn new(client: redis::Client) -> Self {
            Self { client }
        }

        async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
            self.client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| FlashKitError::Session(e.to_string()))
        }
    }

    #[async_trait]
    impl SessionStore for RedisStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let mut conn = self.connection().await?;
            let value: Option<String> = conn
                .get(key)
                .await
                .map_err(|e| FlashKitError::Session(e.to_string()))?;
            Ok(value)
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            let mut conn = self.connection().await?;
            conn.set::<_, _, ()>(key, value)
                .await
                .map_err(|e| FlashKitError::Session(e.to_string()))?;
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            let mut conn = self.connection().await?;
            conn.del::<_, ()>(key)
                .await
                .map_err(|e| FlashKitError::Session(e.to_string()))?;
            Ok(())
        }

        /// GETDEL，需要 Redis 6.2+
        async fn take(&self, key: &str) -> Result<Option<String>> {
            let mut conn = self.connection().await?;
            conn.get_del(key)
                .await
                .map_err(|e| FlashKitError::Session(e.to_string()))
        }
    }
}
