//! 应用层

pub mod system;
pub mod users;

use std::{sync::Arc, time::Instant};

use axum::{middleware, routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    core::middleware::{
        panic_handler, request_logging_middleware, timeout_envelope, MakeRequestUuidV4,
    },
    infrastructure::config::AppConfig,
};
use system::handler::{api_info, health_check, route_not_found};
use users::{service::UserService, store::UserStore};

/// 404 响应中列出的可用端点
pub const ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /health",
    "GET /users",
    "GET /users?active=true|false",
    "GET /users/city/:cityName",
    "GET /users/status/active",
    "GET /users/status/inactive",
    "GET /users/:id",
    "POST /users",
    "PUT /users/:id",
    "DELETE /users/:id",
];

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub config: Arc<AppConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, store: UserStore) -> Self {
        Self {
            users: UserService::new(store),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

/// 组装路由与中间件
pub fn build_router(state: AppState) -> Router {
    let expose_details = state.config.environment.exposes_error_details();
    let request_timeout = state.config.request_timeout;

    Router::new()
        .route("/", get(api_info).fallback(route_not_found))
        .route("/health", get(health_check).fallback(route_not_found))
        .merge(users::handler::routes())
        .fallback(route_not_found)
        .with_state(state)
        // 由内到外：panic 捕获 -> 超时 -> 超时信封 -> 请求日志 -> trace -> request id -> CORS
        .layer(CatchPanicLayer::custom(panic_handler(expose_details)))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(timeout_envelope))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let request_id = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id,
                        status = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(res.status()));
                    },
                ),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
        .layer(CorsLayer::permissive())
}
