use std::fmt;
use std::str::FromStr;

use crate::{EnsembleError, Result};
use serde::{Deserialize, Serialize};

/// 工作负载支持的 HTTP 方法，其他方法在解析时即被拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for Method {
    type Err = EnsembleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(EnsembleError::InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = EnsembleError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Self(code))
        } else {
            Err(EnsembleError::ParseError(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..=499).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..=599).contains(&self.0)
    }

    pub fn reason_phrase(&self) -> &'static str {
        reason_phrase(self.0)
    }
}

/// 常见状态码的描述
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        0 => "Incomplete",
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_is_case_insensitive() {
        assert_eq!(Method::parse("post").unwrap(), Method::Post);
        assert_eq!(Method::parse("Delete").unwrap(), Method::Delete);
        assert_eq!(Method::parse(" get ").unwrap(), Method::Get);
    }

    #[test]
    fn test_method_rejects_unsupported() {
        assert!(matches!(
            Method::parse("PATCH"),
            Err(EnsembleError::InvalidMethod(m)) if m == "PATCH"
        ));
        assert!(Method::parse("posts").is_err());
        assert!(Method::parse("").is_err());
    }

    #[test]
    fn test_method_serde_uses_uppercase() {
        let method: Method = serde_json::from_str("\"put\"").unwrap();
        assert_eq!(method, Method::Put);
        assert_eq!(serde_json::to_string(&method).unwrap(), "\"PUT\"");
        assert!(serde_json::from_str::<Method>("\"HEAD\"").is_err());
    }

    #[test]
    fn test_status_ranges() {
        let ok = Status::new(204).unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.reason_phrase(), "No Content");

        let missing = Status::new(404).unwrap();
        assert!(missing.is_client_error());
        assert!(!missing.is_success());

        assert!(Status::new(504).unwrap().is_server_error());
        assert!(Status::new(42).is_err());
    }
}
