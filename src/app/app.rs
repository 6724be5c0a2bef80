use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::AppConfig;
use crate::error::{FlashKitError, Result};
use crate::flash::{Flash, FlashCarrier};
use crate::render::Renderer;
use crate::state::{MemoryStore, Session, SessionStore};
use crate::utils::ConfigValidator;

use super::context::RequestContext;
use super::handler::{handler_fn, Handler};
use super::types::{Method, Request, Response};

/// 应用：路由表 + 会话存储 + flash 搬运
///
/// 每个请求的处理流程：
/// 1. 根据请求携带的 ID 打开会话；没有 ID 或 ID 不是本服务签发的，就签发新会话
/// 2. 从会话槽位取出上一次留下的 flash 并清空槽位
/// 3. 执行 handler
/// 4. 未展示过的 flash 写回会话，供下一个请求使用
pub struct App {
    config: AppConfig,
    store: Arc<dyn SessionStore>,
    carrier: FlashCarrier,
    routes: HashMap<Method, HashMap<String, Arc<dyn Handler>>>,
}

impl App {
    pub fn new(config: AppConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate()?;
        let carrier = FlashCarrier::new(config.flash_slot.clone());
        Ok(Self {
            config,
            store,
            carrier,
            routes: HashMap::new(),
        })
    }

    /// 默认配置 + 内存会话存储
    pub fn automatic() -> Self {
        Self {
            carrier: FlashCarrier::default(),
            config: AppConfig::default(),
            store: Arc::new(MemoryStore::new()),
            routes: HashMap::new(),
        }
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// 按配置构造的渲染器
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.config.render_options())
    }

    pub fn route(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self> {
        let path = path.into();
        ConfigValidator::validate_route_path(&path)?;
        tracing::debug!(%method, %path, "route registered");
        self.routes.entry(method).or_default().insert(path, handler);
        Ok(self)
    }

    pub fn get<F>(&mut self, path: impl Into<String>, func: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, Result<Response>>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Get, path, Arc::new(handler_fn(func)))
    }

    pub fn post<F>(&mut self, path: impl Into<String>, func: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, Result<Response>>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Post, path, Arc::new(handler_fn(func)))
    }

    fn lookup(&self, method: Method, path: &str) -> Result<Arc<dyn Handler>> {
        self.routes
            .get(&method)
            .and_then(|routes| routes.get(path))
            .map(Arc::clone)
            .ok_or_else(|| FlashKitError::RouteNotFound {
                method: method.to_string(),
                path: path.to_string(),
            })
    }

    async fn open_session(&self, session_id: Option<&str>) -> Result<Session> {
        let prefix = self.config.session_prefix.clone();
        if let Some(id) = session_id {
            let session = Session::with_prefix(Arc::clone(&self.store), id, prefix.clone());
            if session.is_issued().await? {
                return Ok(session);
            }
            tracing::info!(session = id, "unknown session id, issuing a new one");
        }
        Session::issue(Arc::clone(&self.store), prefix).await
    }

    /// 处理一个请求；路由缺失返回 404，handler 出错返回 500，不会向调用方传播错误
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn serve(&self, request: Request) -> Response {
        let session = match self.open_session(request.session_id.as_deref()).await {
            Ok(session) => session,
            Err(err) => {
                crate::log_error!(err, stage = "open_session");
                return Response::text(500, err.to_string());
            }
        };
        let session_id = session.id().to_string();

        let handler = match self.lookup(request.method, &request.path) {
            Ok(handler) => handler,
            Err(err) => {
                tracing::info!(error = %err, "no matching route");
                let mut response = Response::not_found(request.method, &request.path);
                response.session_id = Some(session_id);
                return response;
            }
        };

        let flash = match self.carrier.take(&session).await {
            Ok(flash) => flash,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read flash from session");
                Flash::new()
            }
        };

        let mut ctx = RequestContext::new(request, session, flash);
        let mut response = match handler.handle(&mut ctx).await {
            Ok(response) => response,
            Err(err) => {
                crate::log_error!(err, session = session_id.as_str());
                Response::text(500, err.to_string())
            }
        };

        let (session, flash) = ctx.into_parts();
        if let Err(err) = self.carrier.persist(&flash, &session).await {
            tracing::warn!(error = %err, "failed to store flash in session");
        }

        tracing::info!(status = response.status, "request handled");
        response.session_id = Some(session_id);
        response
    }
}
