//! 核心响应处理模块

use serde::Serialize;

/// 创建、更新、删除操作的响应结构
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub user: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, user: T) -> Self {
        Self {
            message: message.into(),
            user,
        }
    }
}

/// 列表响应结构，`city` / `status` 仅在按城市或状态筛选时出现
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub count: usize,
    pub users: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(users: Vec<T>) -> Self {
        Self {
            city: None,
            status: None,
            count: users.len(),
            users,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
