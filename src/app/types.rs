use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP 方法
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 入站请求
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// 客户端携带的会话 ID；为空时服务端会新建会话
    pub session_id: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            session_id: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// 出站响应
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
    /// 重定向目标
    pub location: Option<String>,
    /// 由 `App` 在出站时写入
    pub session_id: Option<String>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: None,
            location: None,
            session_id: None,
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            content_type: Some("text/html; charset=utf-8".to_string()),
            ..Self::new(status, body)
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            content_type: Some("text/plain; charset=utf-8".to_string()),
            ..Self::new(status, body)
        }
    }

    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::new(status, "")
        }
    }

    pub fn not_found(method: Method, path: &str) -> Self {
        Self::text(404, format!("{method} {path} not found"))
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status) && self.location.is_some()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
