use crate::Result;
use crate::http::types::Status;
use reqwest::header::HeaderMap as Headers;

/// 一次调用的返回结果
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: Status,
    pub headers: Headers,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, headers: Headers, body: String) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            headers,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn code(&self) -> u16 {
        self.status.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_status() {
        let reply = Reply::new(201, Headers::new(), "created".to_string()).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.code(), 201);

        let reply = Reply::new(404, Headers::new(), String::new()).unwrap();
        assert!(!reply.is_success());

        assert!(Reply::new(1000, Headers::new(), String::new()).is_err());
    }
}
