use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlashKitError>;

#[derive(Debug, Error)]
pub enum FlashKitError {
    #[error("no route for {method} `{path}`")]
    RouteNotFound { method: String, path: String },
    #[error("template `{0}` not found")]
    TemplateNotFound(String),
    #[error("template error: {0}")]
    Template(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for FlashKitError {
    fn from(error: serde_json::Error) -> Self {
        FlashKitError::Serialization(error.to_string())
    }
}
