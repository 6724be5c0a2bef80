use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EnvConfig;

const DEFAULT_DIRECTIVES: &str = "flashkit=info,warn";
const DEBUG_DIRECTIVES: &str = "flashkit=debug,info";

/// 日志配置
///
/// 过滤规则的优先级：显式 `with_filter` > `RUST_LOG` > 按调试模式选择的默认值。
/// 调试模式下额外输出 target、文件行号和线程 ID，便于追踪 flash 在请求间的流转。
#[derive(Clone, Debug, Default)]
pub struct LoggingConfig {
    debug: bool,
    filter: Option<String>,
}

impl LoggingConfig {
    /// 从环境变量读取：
    /// - RUST_LOG: 设置日志级别（error, warn, info, debug, trace）
    /// - FLASHKIT_DEBUG: 启用详细调试输出
    pub fn from_env() -> Self {
        Self {
            debug: EnvConfig::is_debug_mode(),
            filter: EnvConfig::get_env_optional("RUST_LOG"),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// 实际生效的过滤规则
    pub fn directives(&self) -> &str {
        match &self.filter {
            Some(filter) => filter,
            None if self.debug => DEBUG_DIRECTIVES,
            None => DEFAULT_DIRECTIVES,
        }
    }

    /// 安装全局 subscriber，返回是否由本次调用安装
    ///
    /// 重复调用不会 panic，只有第一次生效。过滤规则无法解析时退回默认值。
    pub fn install(&self) -> bool {
        let (env_filter, rejected) = match EnvFilter::try_new(self.directives()) {
            Ok(filter) => (filter, None),
            Err(err) => (EnvFilter::new(self.fallback_directives()), Some(err)),
        };

        let fmt_layer = fmt::layer()
            .with_target(self.debug)
            .with_file(self.debug)
            .with_line_number(self.debug)
            .with_thread_ids(self.debug);

        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok();

        if installed {
            if let Some(err) = rejected {
                tracing::warn!(filter = self.directives(), error = %err, "invalid log filter, using defaults");
            }
            if self.debug {
                tracing::debug!("debug logging enabled");
            }
        }
        installed
    }

    /// 按环境变量初始化日志系统
    ///
    /// ```no_run
    /// use flashkit::utils::LoggingConfig;
    ///
    /// fn main() {
    ///     LoggingConfig::init();
    ///     tracing::info!("ready");
    /// }
    /// ```
    pub fn init() {
        Self::from_env().install();
    }

    fn fallback_directives(&self) -> &'static str {
        if self.debug {
            DEBUG_DIRECTIVES
        } else {
            DEFAULT_DIRECTIVES
        }
    }
}

/// 便捷宏：记录带上下文的错误
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {
        tracing::error!(error = %$err, "request failed")
    };
    ($err:expr, $($key:tt = $value:expr),+) => {
        tracing::error!(error = %$err, $($key = $value),+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_follow_debug_mode() {
        let quiet = LoggingConfig::default();
        assert!(!quiet.is_debug());
        assert_eq!(quiet.directives(), "flashkit=info,warn");

        let debug = LoggingConfig::default().with_debug(true);
        assert!(debug.is_debug());
        assert_eq!(debug.directives(), "flashkit=debug,info");
    }

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig::default()
            .with_debug(true)
            .with_filter("flashkit=trace");
        assert_eq!(config.directives(), "flashkit=trace");
        assert_eq!(config.fallback_directives(), "flashkit=debug,info");
    }

    #[test]
    fn install_twice_is_harmless() {
        LoggingConfig::default().with_filter("flashkit=trace").install();
        assert!(!LoggingConfig::default().install());
    }
}
