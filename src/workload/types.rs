use std::collections::HashSet;
use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::http::Method;
use crate::http::headers::{self, header_map};
use crate::{EnsembleError, Result};

/// 一次提交的一批请求
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Workload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: Vec<Request>,

    /// 按列表顺序逐个执行
    #[serde(
        default,
        rename = "strictorder",
        alias = "syncOrder",
        alias = "strictOrder"
    )]
    pub strict_order: bool,

    /// 批次截止时间（毫秒），0 或负数表示使用默认值
    #[serde(default)]
    pub timeout: i64,

    /// 所有请求继承的默认 header
    #[serde(default, with = "header_map")]
    pub headers: HeaderMap,

    /// 用入站批次调用的 header 覆盖 `headers`
    #[serde(default, rename = "useHeaders")]
    pub use_headers: bool,

    #[serde(skip)]
    inbound: HeaderMap,
}

impl Workload {
    pub fn new(requests: Vec<Request>) -> Self {
        Self {
            requests,
            ..Self::default()
        }
    }

    pub fn strict(mut self, strict_order: bool) -> Self {
        self.strict_order = strict_order;
        self
    }

    pub fn with_timeout(mut self, millis: i64) -> Self {
        self.timeout = millis;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn use_inbound_headers(mut self, enabled: bool) -> Self {
        self.use_headers = enabled;
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EnsembleError::ParseError(e.to_string()))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| EnsembleError::ParseError(e.to_string()))
    }

    /// 记录提交该工作负载的调用所携带的 header
    pub fn set_inbound_headers(&mut self, headers: HeaderMap) {
        self.inbound = headers;
    }

    pub fn with_inbound_headers(mut self, headers: HeaderMap) -> Self {
        self.set_inbound_headers(headers);
        self
    }

    /// 每个顶层请求的初始 header
    pub fn inherited_headers(&self) -> HeaderMap {
        let mut inherited = self.headers.clone();
        if self.use_headers {
            headers::overlay(&mut inherited, &self.inbound);
        }
        inherited
    }

    /// 调用方指定的截止时间（如果有）
    pub fn deadline(&self) -> Option<Duration> {
        u64::try_from(self.timeout)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// 执行前的结构校验
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for request in &self.requests {
            if !seen.insert(request.id.as_str()) {
                return Err(EnsembleError::Validation(format!(
                    "duplicate request id '{}'",
                    request.id
                )));
            }
        }
        Ok(())
    }
}

/// 工作负载中的顶层请求
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Request {
    /// 用于关联请求与响应
    #[serde(default)]
    pub id: String,

    pub url: String,

    pub method: Method,

    /// 请求体，启用 `useData` 时作为依赖数据的模板
    #[serde(default, rename = "data", alias = "payload")]
    pub body: String,

    #[serde(default, with = "header_map")]
    pub headers: HeaderMap,

    #[serde(default, rename = "dependency", deserialize_with = "null_as_default")]
    pub depends: Vec<Dependency>,

    /// 将组合后的依赖结果填入 `body`
    #[serde(default, rename = "useData")]
    pub use_data: bool,

    /// 从最后一个依赖响应中复制 `dep_headers` 列出的 header
    #[serde(default, rename = "useDepHeader")]
    pub use_dep_header: bool,

    #[serde(
        default,
        rename = "DepHeaders",
        alias = "depHeaders",
        deserialize_with = "null_as_default"
    )]
    pub dep_headers: Vec<String>,

    /// 用 `join_char` 拼接依赖结果，而不是组成 JSON 数组
    #[serde(default, rename = "doJoin")]
    pub do_join: bool,

    #[serde(default, rename = "joinChar")]
    pub join_char: String,

    /// 将响应体解析为 JSON 放入 `Response::object`
    #[serde(default, rename = "evalJson", alias = "evalRespJson")]
    pub eval_json: bool,
}

impl Request {
    pub fn new(id: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            method,
            ..Self::default()
        }
    }

    pub fn has_dependencies(&self) -> bool {
        !self.depends.is_empty()
    }
}

/// 前置调用。依赖不会递归解析，只描述单次调用。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Dependency {
    pub request: CallSpec,
}

impl From<CallSpec> for Dependency {
    fn from(request: CallSpec) -> Self {
        Self { request }
    }
}

/// 发起一次调用所需的字段
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CallSpec {
    #[serde(default)]
    pub id: String,

    pub url: String,

    pub method: Method,

    #[serde(default, rename = "data", alias = "payload")]
    pub body: String,

    #[serde(default, with = "header_map")]
    pub headers: HeaderMap,
}

impl CallSpec {
    pub fn new(id: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            method,
            ..Self::default()
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_full_workload() {
        let workload = Workload::from_json(
            r#"{
                "requests": [
                    {"id":"1","url":"http://localhost:8080/test1","method":"get","payload":"foo=bar",
                     "headers":{"Content-Type":["application/x-www-form-urlencoded"]},"dependency":null},
                    {"id":"2","url":"http://localhost:8080/test2","method":"POST","data":"{\"data\":[%s]}",
                     "evalJson":true,
                     "dependency":[
                        {"request":{"id":"21","url":"http://localhost:8080/provide1","method":"GET"}},
                        {"request":{"id":"22","url":"http://localhost:8080/provide2","method":"GET"}}
                     ],
                     "useData":true,"doJoin":true,"joinChar":",",
                     "useDepHeader":true,"DepHeaders":["X-Token"]}
                ],
                "strictorder": true,
                "timeout": 2500
            }"#,
        )
        .unwrap();

        assert!(workload.strict_order);
        assert_eq!(workload.deadline(), Some(Duration::from_millis(2500)));
        assert_eq!(workload.requests.len(), 2);

        let first = &workload.requests[0];
        assert_eq!(first.method, Method::Get);
        assert_eq!(first.body, "foo=bar");
        assert!(!first.has_dependencies());

        let second = &workload.requests[1];
        assert!(second.use_data && second.do_join && second.eval_json && second.use_dep_header);
        assert_eq!(second.join_char, ",");
        assert_eq!(second.dep_headers, vec!["X-Token".to_string()]);
        assert_eq!(second.depends.len(), 2);
        assert_eq!(second.depends[1].request.method, Method::Get);
    }

    #[test]
    fn test_sync_order_alias() {
        let workload = Workload::from_json(r#"{"requests":[],"syncOrder":true}"#).unwrap();
        assert!(workload.strict_order);
    }

    #[test]
    fn test_invalid_method_rejects_document() {
        let err = Workload::from_json(
            r#"{"requests":[{"id":"1","url":"http://localhost/x","method":"PATCH"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EnsembleError::ParseError(msg) if msg.contains("PATCH")));

        let err = Workload::from_json(
            r#"{"requests":[{"id":"1","url":"http://localhost/x","method":"GET","dependency":[
                {"request":{"id":"d","url":"http://localhost/d","method":"OPTIONS"}}]}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_method_rejects_document() {
        let err = Workload::from_json(r#"{"requests":[{"id":"1","url":"http://localhost/x"}]}"#)
            .unwrap_err();
        assert!(matches!(err, EnsembleError::ParseError(msg) if msg.contains("method")));

        let err = Workload::from_json(
            r#"{"requests":[{"id":"1","url":"http://localhost/x","method":"GET","dependency":[
                {"request":{"id":"d","url":"http://localhost/d"}}]}]}"#,
        );
        assert!(err.is_err());

        let err = Workload::from_json(
            r#"{"requests":[{"id":"1","url":"http://localhost/x","method":""}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EnsembleError::ParseError(_)));
    }

    #[test]
    fn test_nested_dependencies_are_ignored() {
        let workload = Workload::from_json(
            r#"{"requests":[{"id":"1","url":"http://localhost/x","method":"GET","dependency":[
                {"request":{"id":"d","url":"http://localhost/d","method":"GET",
                            "dependency":[{"request":{"id":"dd","url":"http://localhost/dd"}}]}}]}]}"#,
        )
        .unwrap();
        assert_eq!(workload.requests[0].depends.len(), 1);
        assert_eq!(workload.requests[0].depends[0].request.id, "d");
    }

    #[test]
    fn test_non_positive_timeout_means_default() {
        let mut workload = Workload::default();
        assert_eq!(workload.deadline(), None);
        workload.timeout = -5;
        assert_eq!(workload.deadline(), None);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut workload = Workload::default();
        workload.requests.push(Request::new("a", Method::Get, "http://x"));
        workload.requests.push(Request::new("b", Method::Get, "http://x"));
        assert!(workload.validate().is_ok());

        workload.requests.push(Request::new("a", Method::Get, "http://x"));
        assert!(matches!(
            workload.validate(),
            Err(EnsembleError::Validation(msg)) if msg.contains("'a'")
        ));
    }

    #[test]
    fn test_inbound_headers_only_used_when_enabled() {
        let mut defaults = HeaderMap::new();
        defaults.insert("x-tenant", HeaderValue::from_static("default"));
        let mut inbound = HeaderMap::new();
        inbound.insert("x-tenant", HeaderValue::from_static("caller"));

        let workload = Workload::new(Vec::new())
            .with_headers(defaults)
            .with_inbound_headers(inbound);

        assert_eq!(workload.inherited_headers().get("x-tenant").unwrap(), "default");

        let workload = workload.use_inbound_headers(true);
        assert_eq!(workload.inherited_headers().get("x-tenant").unwrap(), "caller");
    }
}
