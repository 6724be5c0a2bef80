use std::collections::BTreeMap;

use crate::error::Result;
use crate::state::Session;

use super::flash::{Flash, FlashMessages};

/// 默认的会话槽位名
pub const DEFAULT_FLASH_SLOT: &str = "_flash";

/// 在重定向前后通过会话搬运 flash 数据
///
/// 槽位只会被读取一次：`take` 之后立即删除，因此数据只对下一个请求可见。
#[derive(Clone, Debug)]
pub struct FlashCarrier {
    slot: String,
}

impl Default for FlashCarrier {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH_SLOT)
    }
}

impl FlashCarrier {
    pub fn new(slot: impl Into<String>) -> Self {
        Self { slot: slot.into() }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// 请求开始时调用：取出上一个响应留下的数据并清空槽位
    ///
    /// 槽位内容无法解析时记录告警并视为空。
    pub async fn take(&self, session: &Session) -> Result<Flash> {
        let Some(raw) = session.take(&self.slot).await? else {
            return Ok(Flash::new());
        };

        match serde_json::from_str::<BTreeMap<String, FlashMessages>>(&raw) {
            Ok(data) => {
                tracing::debug!(
                    session = %session.id(),
                    categories = data.len(),
                    "flash restored from session"
                );
                Ok(Flash::from_map(data))
            }
            Err(err) => {
                tracing::warn!(
                    session = %session.id(),
                    error = %err,
                    "discarding unreadable flash slot"
                );
                Ok(Flash::new())
            }
        }
    }

    /// 响应结束时调用：未展示过的非空 flash 写入会话，返回是否写入
    pub async fn persist(&self, flash: &Flash, session: &Session) -> Result<bool> {
        if flash.is_empty() || flash.is_delivered() {
            return Ok(false);
        }
        let raw = serde_json::to_string(flash)?;
        session.set(&self.slot, raw).await?;
        tracing::debug!(
            session = %session.id(),
            messages = flash.len(),
            "flash stored for next request"
        );
        Ok(true)
    }
}
