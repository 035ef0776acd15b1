use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug_span, error, info, info_span, warn};
use uuid::Uuid;

use crate::Result;
use crate::config::EngineConfig;
use crate::engine::executor::RequestExecutor;
use crate::http::{Client, Transport};
use crate::workload::{BatchResult, Request, Response, Workload};

/// 工作负载和配置都未指定时使用的批次截止时间
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// 批次编排器
///
/// 不保存任何批次状态，同一个实例可以同时处理任意多个批次。
#[derive(Clone)]
pub struct Orchestrator {
    executor: Arc<RequestExecutor>,
    default_deadline: Duration,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            executor: Arc::new(RequestExecutor::new(transport)),
            default_deadline: DEFAULT_BATCH_TIMEOUT,
        }
    }

    /// 基于 HTTP [`Client`] 构建编排器
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let client = Client::with_timeout(config.call_timeout())?;
        Ok(Self::new(Arc::new(client)).with_default_deadline(config.batch_timeout()))
    }

    pub fn with_default_deadline(mut self, deadline: Duration) -> Self {
        self.default_deadline = deadline;
        self
    }

    pub fn default_deadline(&self) -> Duration {
        self.default_deadline
    }

    /// 执行 `workload` 中的所有顶层请求
    ///
    /// `responses[i]` 始终对应 `workload.requests[i]`。并发模式下，截止时间
    /// 到达时仍未完成的请求保留状态码 0；严格顺序模式会执行完所有请求。
    pub async fn execute(&self, workload: Workload) -> BatchResult {
        let span = info_span!("batch", id = %Uuid::new_v4());
        self.run(workload).instrument(span).await
    }

    async fn run(&self, workload: Workload) -> BatchResult {
        if let Err(e) = workload.validate() {
            warn!(error = %e, "rejecting workload");
            return BatchResult::failure(&e);
        }

        let deadline = workload.deadline().unwrap_or(self.default_deadline);
        let inherited = workload.inherited_headers();
        let Workload {
            requests,
            strict_order,
            ..
        } = workload;

        let total = requests.len();
        info!(
            requests = total,
            strict_order,
            deadline_ms = deadline.as_millis() as u64,
            "executing workload"
        );

        let mut responses: Vec<Response> =
            requests.iter().map(|r| Response::pending(&r.id)).collect();
        let cancel = CancellationToken::new();

        if strict_order {
            self.run_in_order(&requests, &inherited, &cancel, &mut responses)
                .await;
        } else {
            let deadline_at = Instant::now() + deadline;
            self.run_concurrently(requests, &inherited, deadline_at, &cancel, &mut responses)
                .await;
        }
        cancel.cancel();

        let completed = responses.iter().filter(|r| r.is_complete()).count();
        info!(completed, total, "workload finished");

        BatchResult::new(responses)
    }

    /// 严格顺序执行：不受批次截止时间限制，每次调用仅受单次调用超时约束
    async fn run_in_order(
        &self,
        requests: &[Request],
        inherited: &HeaderMap,
        cancel: &CancellationToken,
        responses: &mut [Response],
    ) {
        for (index, request) in requests.iter().enumerate() {
            responses[index] = self.executor.run(request, inherited.clone(), cancel).await;
        }
    }

    async fn run_concurrently(
        &self,
        requests: Vec<Request>,
        inherited: &HeaderMap,
        deadline_at: Instant,
        cancel: &CancellationToken,
        responses: &mut [Response],
    ) {
        let mut units = JoinSet::new();
        let mut slots = HashMap::with_capacity(requests.len());

        for (index, request) in requests.into_iter().enumerate() {
            let executor = Arc::clone(&self.executor);
            let headers = inherited.clone();
            let cancel = cancel.child_token();
            let span = debug_span!("request", id = %request.id, index);

            let handle = units.spawn(
                async move {
                    let response = executor.run(&request, headers, &cancel).await;
                    (index, response)
                }
                .instrument(span),
            );
            slots.insert(handle.id(), index);
        }

        let expired = tokio::time::sleep_until(deadline_at);
        tokio::pin!(expired);

        loop {
            tokio::select! {
                biased;
                joined = units.join_next() => match joined {
                    Some(Ok((index, response))) => responses[index] = response,
                    Some(Err(e)) => {
                        if let Some(&index) = slots.get(&e.id()) {
                            error!(index, error = %e, "request task did not complete");
                            let id = responses[index].id.clone();
                            responses[index] = Response::failure(id, 500, "request task failed");
                        }
                    }
                    None => break,
                },
                _ = &mut expired => {
                    warn!(
                        outstanding = units.len(),
                        "timed out waiting for all requests to complete"
                    );
                    cancel.cancel();
                    units.abort_all();
                    break;
                }
            }
        }
    }
}
