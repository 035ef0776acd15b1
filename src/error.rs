use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnsembleError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid workload: {0}")]
    Validation(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("request cancelled before it completed")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl EnsembleError {
    /// 调用在收到 HTTP 状态前失败时，单个请求响应中使用的状态码
    pub fn status_code(&self) -> u16 {
        match self {
            EnsembleError::HttpError(e) if e.is_timeout() => 504,
            EnsembleError::InvalidMethod(_) | EnsembleError::Validation(_) => 400,
            EnsembleError::ParseError(_) | EnsembleError::JsonError(_) => 400,
            _ => 500,
        }
    }
}

impl From<anyhow::Error> for EnsembleError {
    fn from(err: anyhow::Error) -> Self {
        EnsembleError::Other(err.to_string())
    }
}

impl From<toml::de::Error> for EnsembleError {
    fn from(err: toml::de::Error) -> Self {
        EnsembleError::Config(err.to_string())
    }
}

/// ensemble 的 Result 类型别名
pub type Result<T> = std::result::Result<T, EnsembleError>;
