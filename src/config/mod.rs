pub mod app_config;
pub mod env;

pub use app_config::AppConfig;
pub use env::EnvConfig;
