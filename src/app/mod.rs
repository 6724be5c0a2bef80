// 请求处理管线模块

mod app;
mod client;
mod context;
mod handler;
mod types;

pub use app::App;
pub use client::Client;
pub use context::RequestContext;
pub use handler::{handler_fn, FnHandler, Handler};
pub use types::{Method, Request, Response};
