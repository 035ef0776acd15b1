use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::engine::dispatch;
use crate::http::headers;
use crate::http::{Call, Transport};
use crate::workload::compose::{self, Composition};
use crate::workload::{Request, Response};

/// 所有依赖成功后父请求需要的内容
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// 组合后的请求体，仅在请求使用依赖数据时存在
    pub body: Option<String>,
    /// 从最后一个依赖响应中取出的 header
    pub headers: HeaderMap,
}

#[derive(Debug, Clone)]
pub enum Resolved {
    Ready(Resolution),
    /// 解析中止，该响应直接作为父请求的响应
    Failed(Response),
}

/// 按顺序执行单个请求的依赖，遇到第一个失败即停止
pub struct DependencyResolver<'a> {
    transport: &'a dyn Transport,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub async fn resolve(
        &self,
        request: &Request,
        inherited: &HeaderMap,
        cancel: &CancellationToken,
    ) -> Resolved {
        let mut dataset = Vec::with_capacity(request.depends.len());
        let mut last_headers = HeaderMap::new();

        for dependency in &request.depends {
            let spec = &dependency.request;
            let mut call_headers = inherited.clone();
            headers::overlay(&mut call_headers, &spec.headers);

            let call = Call::new(spec.method, &spec.url)
                .with_headers(call_headers)
                .with_body(&spec.body);

            debug!(parent = %request.id, dependency = %spec.id, url = %spec.url, "calling dependency");

            match dispatch(self.transport, call, cancel).await {
                Ok(reply) if reply.is_success() => {
                    dataset.push(reply.body);
                    last_headers = reply.headers;
                }
                Ok(reply) => {
                    debug!(
                        parent = %request.id,
                        dependency = %spec.id,
                        code = reply.code(),
                        "dependency failed, skipping the rest"
                    );
                    return Resolved::Failed(Response::from_reply(&spec.id, reply));
                }
                Err(e) => {
                    warn!(parent = %request.id, dependency = %spec.id, error = %e, "dependency call failed");
                    return Resolved::Failed(Response::from_error(&spec.id, &e));
                }
            }
        }

        let body = if request.use_data {
            let mode = Composition::new(request.do_join, &request.join_char);
            match compose::compose(&request.body, &dataset, mode) {
                Ok(body) => {
                    debug!(parent = %request.id, body = %body, "composed dependency data");
                    Some(body)
                }
                Err(e) => {
                    error!(parent = %request.id, error = %e, "unable to compose dependency data");
                    return Resolved::Failed(Response::failure(&request.id, 500, e.to_string()));
                }
            }
        } else {
            None
        };

        let mut dependency_headers = HeaderMap::new();
        if request.use_dep_header && !request.dep_headers.is_empty() {
            headers::overlay_named(&mut dependency_headers, &last_headers, &request.dep_headers);
        }

        Resolved::Ready(Resolution {
            body,
            headers: dependency_headers,
        })
    }
}
