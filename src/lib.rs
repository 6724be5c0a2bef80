pub mod app;
pub mod config;
pub mod error;
pub mod flash;
pub mod render;
pub mod state;
pub mod utils;

pub use app::{handler_fn, App, Client, Handler, Method, Request, RequestContext, Response};
pub use config::{AppConfig, EnvConfig};
pub use error::{FlashKitError, Result};
pub use flash::{Flash, FlashCarrier, FlashMessages, DEFAULT_FLASH_SLOT, FLASH_KEY};
pub use render::{PathResolver, RenderData, RenderOptions, Renderer, View};
#[cfg(feature = "redis-store")]
pub use state::RedisStore;
pub use state::{MemoryStore, Session, SessionStore};
pub use utils::{logging, validation};
