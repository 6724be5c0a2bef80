use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FlashKitError, Result};
use crate::flash::DEFAULT_FLASH_SLOT;
use crate::render::RenderOptions;
use crate::state::DEFAULT_SESSION_PREFIX;
use crate::utils::ConfigValidator;

use super::env::{EnvConfig, ENV_FLASH_SLOT, ENV_LAYOUT, ENV_SESSION_PREFIX, ENV_TEMPLATE_DIR};

fn default_flash_slot() -> String {
    DEFAULT_FLASH_SLOT.to_string()
}

fn default_session_prefix() -> String {
    DEFAULT_SESSION_PREFIX.to_string()
}

/// 应用配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 会话中存放 flash 数据的槽位名
    #[serde(default = "default_flash_slot")]
    pub flash_slot: String,
    #[serde(default = "default_session_prefix")]
    pub session_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            flash_slot: default_flash_slot(),
            session_prefix: default_session_prefix(),
            layout: None,
            template_dir: None,
        }
    }
}

impl AppConfig {
    /// 默认值叠加环境变量
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(slot) = EnvConfig::get_env_optional(ENV_FLASH_SLOT) {
            config.flash_slot = slot;
        }
        if let Some(prefix) = EnvConfig::get_env_optional(ENV_SESSION_PREFIX) {
            config.session_prefix = prefix;
        }
        if let Some(layout) = EnvConfig::get_env_optional(ENV_LAYOUT) {
            config.layout = Some(PathBuf::from(layout));
        }
        if let Some(dir) = EnvConfig::get_env_optional(ENV_TEMPLATE_DIR) {
            config.template_dir = Some(PathBuf::from(dir));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| FlashKitError::Config(format!("invalid config json: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| FlashKitError::Config(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_slot_name(&self.flash_slot)?;
        ConfigValidator::validate_session_prefix(&self.session_prefix)?;
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            html_layout: self.layout.clone(),
            template_dir: self.template_dir.clone(),
        }
    }
}
