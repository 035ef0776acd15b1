use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tracing::debug;

use crate::Result;
use crate::http::Transport;
use crate::http::request::Call;
use crate::http::response::Reply;

/// 未配置时的单次调用超时
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(1);

/// 调用未携带 Content-Type 时使用的默认值
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::builder()
                .timeout(DEFAULT_CALL_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// 创建每次调用都受 `timeout` 限制的客户端
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }

    pub async fn execute(&self, call: Call) -> Result<Reply> {
        let url = reqwest::Url::parse(&call.url)?;
        let mut headers = call.headers;
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        }

        let mut req = self
            .inner
            .request(call.method.into(), url)
            .headers(headers);

        if let Some(body) = call.body {
            req = req.body(body);
        }

        let start = Instant::now();
        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        let elapsed = start.elapsed();

        debug!(
            method = %call.method,
            url = %call.url,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "call returned"
        );

        Reply::new(status, headers, body)
    }
}

#[async_trait]
impl Transport for Client {
    async fn send(&self, call: Call) -> Result<Reply> {
        self.execute(call).await
    }
}
