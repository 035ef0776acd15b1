use reqwest::header::HeaderMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::EnsembleError;
use crate::http::Reply;
use crate::http::headers::header_map;

/// 响应体的结构化结果
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseObject {
    /// 未解析
    #[default]
    Raw,
    Decoded(serde_json::Value),
    DecodeError(String),
}

impl ResponseObject {
    /// 将 `body` 解析为 JSON，失败时记录错误而不是返回错误
    pub fn decode(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => ResponseObject::Decoded(value),
            Err(e) => ResponseObject::DecodeError(e.to_string()),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ResponseObject::Raw)
    }
}

impl Serialize for ResponseObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ResponseObject::Raw => serializer.serialize_none(),
            ResponseObject::Decoded(value) => value.serialize(serializer),
            ResponseObject::DecodeError(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

/// 单个顶层请求的结果
///
/// 状态码为 `0` 表示请求在批次截止时间前未完成。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    pub id: String,

    #[serde(rename = "data")]
    pub body: String,

    #[serde(skip_serializing_if = "ResponseObject::is_raw")]
    pub object: ResponseObject,

    pub code: u16,

    #[serde(with = "header_map")]
    pub headers: HeaderMap,
}

impl Response {
    /// 请求 `id` 对应的空槽位
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn from_reply(id: impl Into<String>, reply: Reply) -> Self {
        Self {
            id: id.into(),
            code: reply.code(),
            body: reply.body,
            headers: reply.headers,
            object: ResponseObject::Raw,
        }
    }

    pub fn failure(id: impl Into<String>, code: u16, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: message.into(),
            code,
            ..Self::default()
        }
    }

    /// 未得到 HTTP 状态的调用
    pub fn from_error(id: impl Into<String>, err: &EnsembleError) -> Self {
        Self::failure(id, err.status_code(), err.to_string())
    }

    pub fn is_complete(&self) -> bool {
        self.code != 0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.code)
    }
}

/// 单个批次的返回结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub responses: Vec<Response>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl BatchResult {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses,
            ..Self::default()
        }
    }

    /// 整个批次无法处理
    pub fn failure(err: &EnsembleError) -> Self {
        Self {
            responses: Vec::new(),
            err: Some(err.to_string()),
            code: Some(err.status_code()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.err.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_object_is_omitted() {
        let response = Response::failure("1", 404, "not here");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"id": "1", "data": "not here", "code": 404, "headers": {}})
        );
    }

    #[test]
    fn test_decoded_object_is_inlined() {
        let mut response = Response::pending("2");
        response.object = ResponseObject::decode(r#"{"age":25}"#);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["object"], json!({"age": 25}));
    }

    #[test]
    fn test_decode_error_is_nested() {
        let object = ResponseObject::decode("<html>");
        assert!(matches!(object, ResponseObject::DecodeError(_)));
        let value = serde_json::to_value(&object).unwrap();
        assert!(value["error"].as_str().unwrap().contains("expected value"));
    }

    #[test]
    fn test_pending_slot_is_incomplete() {
        let response = Response::pending("slow");
        assert_eq!(response.id, "slow");
        assert_eq!(response.code, 0);
        assert!(response.body.is_empty());
        assert!(!response.is_complete());
    }

    #[test]
    fn test_batch_failure_document() {
        let result = BatchResult::failure(&EnsembleError::Validation("duplicate request id 'a'".into()));
        assert!(result.is_failure());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["code"], 400);
        assert_eq!(value["responses"], json!([]));
        assert!(value["err"].as_str().unwrap().contains("duplicate"));
    }
}
