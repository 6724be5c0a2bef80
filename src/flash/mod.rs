// Flash 消息模块

mod carrier;
mod flash;

pub use carrier::{FlashCarrier, DEFAULT_FLASH_SLOT};
pub use flash::{Flash, FlashMessages};

/// 渲染上下文中保留的绑定名
pub const FLASH_KEY: &str = "flash";
