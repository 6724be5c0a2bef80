use crate::error::{FlashKitError, Result};

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证会话槽位名：非空，且不能含 `.`（会与模板路径分隔符冲突）
    pub fn validate_slot_name(slot: &str) -> Result<()> {
        if slot.trim().is_empty() {
            return Err(FlashKitError::Config("flash slot must not be empty".into()));
        }
        if slot.contains('.') || slot.contains(':') {
            return Err(FlashKitError::Config(format!(
                "flash slot `{slot}` must not contain `.` or `:`"
            )));
        }
        Ok(())
    }

    /// 验证会话 key 前缀
    pub fn validate_session_prefix(prefix: &str) -> Result<()> {
        if prefix.is_empty() {
            return Err(FlashKitError::Config(
                "session prefix must not be empty".into(),
            ));
        }
        if !prefix
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(FlashKitError::Config(format!(
                "session prefix `{prefix}` may only contain letters, digits, `_` and `-`"
            )));
        }
        Ok(())
    }

    /// 验证路由路径
    pub fn validate_route_path(path: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(FlashKitError::Config(format!(
                "route `{path}` must start with `/`"
            )));
        }
        if path.chars().any(char::is_whitespace) {
            return Err(FlashKitError::Config(format!(
                "route `{path}` must not contain whitespace"
            )));
        }
        Ok(())
    }
}
