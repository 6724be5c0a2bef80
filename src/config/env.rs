use crate::error::{FlashKitError, Result};
use std::env;

pub const ENV_FLASH_SLOT: &str = "FLASHKIT_FLASH_SLOT";
pub const ENV_SESSION_PREFIX: &str = "FLASHKIT_SESSION_PREFIX";
pub const ENV_LAYOUT: &str = "FLASHKIT_LAYOUT";
pub const ENV_TEMPLATE_DIR: &str = "FLASHKIT_TEMPLATE_DIR";
pub const ENV_DEBUG: &str = "FLASHKIT_DEBUG";

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 从环境变量获取值
    pub fn get_env(key: &str) -> Result<String> {
        env::var(key)
            .map_err(|_| FlashKitError::Config(format!("environment variable `{key}` is not set")))
    }

    /// 获取可选的环境变量，空字符串视为未设置
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.trim().is_empty())
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var(ENV_DEBUG).is_ok()
    }
}

/// 宏：简化环境变量获取
#[macro_export]
macro_rules! env_var {
    ($key:expr) => {
        $crate::config::EnvConfig::get_env($key)
    };
}
