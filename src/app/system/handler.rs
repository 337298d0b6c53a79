//! 系统处理器：服务信息、健康检查、404 兜底

use axum::{
    extract::State,
    http::{Method, Uri},
    response::Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    app::{users::model::UserCounts, AppState, ENDPOINTS},
    core::error::CoreError,
    infrastructure::system_info::{MemoryUsage, SystemInfo},
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// 秒
    pub uptime: f64,
    pub memory: MemoryUsage,
    pub users: UserCounts,
}

/// 服务信息
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", state.config.service_name),
        "version": state.config.service_version,
        "environment": state.config.environment.as_str(),
        "endpoints": ENDPOINTS,
    }))
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        memory: SystemInfo::new().process_memory(),
        users: state.users.counts(),
    })
}

/// 未匹配的路径或方法
pub async fn route_not_found(method: Method, uri: Uri) -> CoreError {
    CoreError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
        available_endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    }
}
