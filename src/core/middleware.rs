//! 核心中间件模块

use std::{any::Any, time::Instant};

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::error::CoreError;

/// 为每个请求生成 UUID v4 作为 `x-request-id`
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _req: &axum::http::Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("n/a")
        .to_string();

    let response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    if status.is_server_error() {
        warn!(
            %method,
            %uri,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            %request_id,
            ?user_agent,
            "request completed with server error"
        );
    } else {
        info!(
            %method,
            %uri,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            %request_id,
            ?user_agent,
            "request completed"
        );
    }

    response
}

/// 把超时层产生的空 408 响应换成统一的 JSON 错误信封
pub async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        warn!("request timed out");
        return CoreError::Timeout.into_response();
    }
    response
}

/// 全局 panic 处理：记录日志并转换为 500 响应，仅在 `expose_details` 时返回 panic 信息
pub fn panic_handler(
    expose_details: bool,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone + Send + Sync + 'static {
    move |payload: Box<dyn Any + Send + 'static>| {
        let detail = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic payload".to_string()
        };

        error!(panic = %detail, "handler panicked");
        CoreError::internal(detail, expose_details).into_response()
    }
}
