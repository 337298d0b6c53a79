//! 核心错误处理模块
//!
//! 处理器可能产生的所有失败都是 [`CoreError`]，统一渲染为带 HTTP 状态码的 JSON 错误信封。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 核心错误类型
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed with {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("invalid user id: {0}")]
    InvalidId(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("user {0} not found")]
    NotFound(String),

    #[error("no route for {method} {path}")]
    RouteNotFound {
        method: String,
        path: String,
        available_endpoints: Vec<String>,
    },

    #[error("email {0} already exists")]
    Conflict(String),

    #[error("request timed out")]
    Timeout,

    /// 非开发环境下 `detail` 为 `None`，不向客户端暴露内部原因
    #[error("internal error: {}", .detail.as_deref().unwrap_or("hidden"))]
    Internal { detail: Option<String> },
}

/// 错误响应结构
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<String>>,
    pub timestamp: String,
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    pub fn internal(detail: impl Into<String>, expose_details: bool) -> Self {
        Self::Internal {
            detail: expose_details.then(|| detail.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) | CoreError::InvalidId(_) | CoreError::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            CoreError::NotFound(_) | CoreError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Timeout => StatusCode::REQUEST_TIMEOUT,
            CoreError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorResponse {
        let code = self.status().as_u16();
        let mut details = None;
        let mut available_endpoints = None;

        let (error, message) = match self {
            CoreError::Validation(errors) => {
                let message = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                details = Some(errors);
                ("Validation failed", message)
            }
            CoreError::InvalidId(raw) => (
                "Invalid user ID",
                format!("User ID must be a positive integer, got '{}'", raw),
            ),
            CoreError::InvalidJson(reason) => ("Invalid JSON", reason),
            CoreError::NotFound(id) => ("User not found", format!("User with ID {} not found", id)),
            CoreError::RouteNotFound {
                method,
                path,
                available_endpoints: endpoints,
            } => {
                available_endpoints = Some(endpoints);
                ("Route not found", format!("Cannot {} {}", method, path))
            }
            CoreError::Conflict(email) => (
                "Email already exists",
                format!("A user with email '{}' already exists", email),
            ),
            CoreError::Timeout => (
                "Request timeout",
                "The request did not complete in time".to_string(),
            ),
            CoreError::Internal { detail } => (
                "Internal server error",
                detail.unwrap_or_else(|| "Something went wrong".to_string()),
            ),
        };

        ErrorResponse {
            error: error.to_string(),
            message,
            code,
            details,
            available_endpoints,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }

        (status, Json(self.into_body())).into_response()
    }
}
