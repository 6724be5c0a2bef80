// 会话状态模块

mod session;
mod store;

pub use session::{new_session_id, Session, DEFAULT_SESSION_PREFIX, ISSUED_KEY};
#[cfg(feature = "redis-store")]
pub use store::redis::RedisStore;
pub use store::{MemoryStore, SessionStore};
