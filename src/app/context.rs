use serde_json::Value;

use crate::error::Result;
use crate::flash::Flash;
use crate::render::{RenderData, View};
use crate::state::Session;

use super::types::{Request, Response};

/// 单个请求的上下文
///
/// 由 `App` 为每个请求构造并显式传给 handler，请求结束后随之丢弃。
/// flash 只属于当前请求，不会在并发请求之间共享。
pub struct RequestContext {
    request: Request,
    session: Session,
    flash: Flash,
    data: RenderData,
}

impl RequestContext {
    pub fn new(request: Request, session: Session, flash: Flash) -> Self {
        Self {
            request,
            session,
            flash,
            data: RenderData::new(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut Flash {
        &mut self.flash
    }

    pub fn data(&self) -> &RenderData {
        &self.data
    }

    /// 写入渲染数据；`flash` 是保留名，渲染时会被覆盖
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.data.insert(key, value);
        self
    }

    /// 渲染视图；flash 绑定到 `flash` 并视为已展示，不再带到下一个请求
    pub fn render(&mut self, status: u16, view: &View) -> Result<Response> {
        let mut data = self.data.clone();
        data.bind_flash(&self.flash);
        let body = view.render(&data)?;
        self.flash.mark_delivered();
        tracing::debug!(
            status,
            flash_messages = self.flash.len(),
            "rendered response"
        );
        Ok(Response::html(status, body))
    }

    /// 重定向；尚未展示的 flash 会在出站时写入会话
    pub fn redirect(&self, status: u16, location: impl Into<String>) -> Response {
        Response::redirect(status, location)
    }

    pub(crate) fn into_parts(self) -> (Session, Flash) {
        (self.session, self.flash)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::render::Renderer;
    use crate::state::MemoryStore;

    fn context() -> RequestContext {
        let session = Session::new(Arc::new(MemoryStore::new()), "ctx");
        RequestContext::new(Request::get("/"), session, Flash::new())
    }

    #[test]
    fn render_binds_flash_and_marks_delivered() -> anyhow::Result<()> {
        let mut ctx = context();
        ctx.flash_mut().add("errors", "A").add("errors", "B");
        ctx.set("flash", json!("shadowed")).set("title", json!("Home"));

        let view = Renderer::default()
            .html_str("{{title}}:{{#each flash.errors as |msg|}}[{{msg}}]{{/each}}");
        let res = ctx.render(201, &view)?;

        assert_eq!(res.status, 201);
        assert_eq!(res.body, "Home:[A][B]");
        assert!(ctx.flash().is_delivered());
        assert_eq!(ctx.data().get("flash"), Some(&json!("shadowed")));
        Ok(())
    }

    #[test]
    fn redirect_leaves_flash_pending() {
        let mut ctx = context();
        ctx.flash_mut().add("success", "saved");
        let res = ctx.redirect(302, "/done");
        assert!(res.is_redirect());
        assert!(!ctx.flash().is_delivered());
    }
}
