use super::app::App;
use super::types::{Method, Request, Response};

/// 进程内客户端，像浏览器一样在请求之间保留会话 ID
pub struct Client<'a> {
    app: &'a App,
    session_id: Option<String>,
}

impl<'a> Client<'a> {
    pub fn new(app: &'a App) -> Self {
        Self {
            app,
            session_id: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub async fn request(&mut self, method: Method, path: &str) -> Response {
        let mut request = Request::new(method, path);
        request.session_id = self.session_id.clone();
        let response = self.app.serve(request).await;
        if let Some(id) = &response.session_id {
            self.session_id = Some(id.clone());
        }
        response
    }

    pub async fn get(&mut self, path: &str) -> Response {
        self.request(Method::Get, path).await
    }

    pub async fn post(&mut self, path: &str) -> Response {
        self.request(Method::Post, path).await
    }

    /// 响应是重定向时继续 GET 目标地址，最多跟随 `max_hops` 次
    pub async fn follow(&mut self, mut response: Response, max_hops: usize) -> Response {
        for _ in 0..max_hops {
            let Some(location) = response.location.clone().filter(|_| response.is_redirect())
            else {
                break;
            };
            tracing::debug!(%location, "following redirect");
            response = self.get(&location).await;
        }
        response
    }
}
