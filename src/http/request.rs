use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::http::types::Method;
use crate::{EnsembleError, Result};

/// 一次完整的出站调用：最终 header 与组合后的请求体
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl Call {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: url.trim().to_string(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| EnsembleError::ParseError(format!("invalid header name {key}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| EnsembleError::ParseError(format!("invalid header value for {key}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// 设置请求体，空字符串表示不带请求体
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = if body.is_empty() {
            None
        } else {
            Some(body.to_owned())
        };
        self
    }
}
