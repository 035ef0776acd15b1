use std::sync::Arc;

use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::engine::dependency::{DependencyResolver, Resolved};
use crate::engine::dispatch;
use crate::http::headers;
use crate::http::{Call, Transport};
use crate::workload::{Request, Response, ResponseObject};

/// 执行单个顶层请求（包括其依赖）
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// 以 `inherited` 为基础执行 `request`，`inherited` 是调用方交给该单元的独立副本
    ///
    /// 失败不会向外传播，而是记录在返回的 [`Response`] 中
    pub async fn run(
        &self,
        request: &Request,
        inherited: HeaderMap,
        cancel: &CancellationToken,
    ) -> Response {
        let mut body = request.body.clone();
        let mut dependency_headers = HeaderMap::new();

        if request.has_dependencies() {
            let resolver = DependencyResolver::new(self.transport.as_ref());
            match resolver.resolve(request, &inherited, cancel).await {
                Resolved::Failed(failure) => return failure,
                Resolved::Ready(resolution) => {
                    if let Some(composed) = resolution.body {
                        body = composed;
                    }
                    dependency_headers = resolution.headers;
                }
            }
        }

        let effective = headers::merge(inherited, &dependency_headers, &request.headers);
        let call = Call::new(request.method, &request.url)
            .with_headers(effective)
            .with_body(&body);

        debug!(id = %request.id, method = %request.method, url = %request.url, "making request");

        match dispatch(self.transport.as_ref(), call, cancel).await {
            Ok(reply) => {
                let mut response = Response::from_reply(&request.id, reply);
                if request.eval_json {
                    response.object = ResponseObject::decode(&response.body);
                }
                response
            }
            Err(e) => {
                warn!(id = %request.id, url = %request.url, error = %e, "request failed");
                Response::from_error(&request.id, &e)
            }
        }
    }
}
