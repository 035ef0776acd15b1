//! HTTP 路由与处理函数

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::warn;

use super::state::AppState;
use crate::guide::GUIDE;
use crate::workload::Workload;

/// 默认请求体大小限制（1MB）
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// 只描述批次调用本身的入站 header，不转发给目标服务
const NON_FORWARDED: [header::HeaderName; 10] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::CONTENT_TYPE,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::EXPECT,
    header::ACCEPT_ENCODING,
];

pub fn create_router(state: AppState) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

pub fn create_router_with_body_limit(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", post(run_batch))
        .route("/ensemble", post(run_batch))
        .route("/help", get(help))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn run_batch(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let workload = match Workload::from_slice(&body) {
        Ok(workload) => workload.with_inbound_headers(forwardable(headers)),
        Err(e) => {
            warn!(error = %e, "unable to parse workload");
            return (
                StatusCode::BAD_REQUEST,
                format!("Unable to parse workload JSON: {e}"),
            )
                .into_response();
        }
    };

    let result = state.orchestrator.execute(workload).await;

    if let Some(err) = &result.err {
        let status = result
            .code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, format!("Problems processing workload: {err}")).into_response();
    }

    Json(result).into_response()
}

async fn help() -> &'static str {
    GUIDE
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn forwardable(mut headers: HeaderMap) -> HeaderMap {
    for name in &NON_FORWARDED {
        headers.remove(name);
    }
    headers
}
