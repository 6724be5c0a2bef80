use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;

use super::context::RequestContext;
use super::types::Response;

/// 请求处理器
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Response>;
}

/// 把闭包包装成 `Handler`
///
/// ```no_run
/// use flashkit::app::{handler_fn, Response};
///
/// let handler = handler_fn(|ctx| {
///     Box::pin(async move {
///         ctx.flash_mut().add("success", "saved");
///         Ok(Response::redirect(302, "/"))
///     })
/// });
/// # let _ = handler;
/// ```
pub struct FnHandler<F> {
    func: F,
}

pub fn handler_fn<F>(func: F) -> FnHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, Result<Response>> + Send + Sync,
{
    FnHandler { func }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, Result<Response>> + Send + Sync,
{
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Response> {
        (self.func)(ctx).await
    }
}
