//! 用户路径参数提取

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use super::validation::parse_user_id;
use crate::core::error::CoreError;

/// `/users/:id` 中的用户 ID
///
/// 非数字或无法解码的段返回 400 "Invalid user ID"，超出 `u64` 的数字返回 404。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| CoreError::InvalidId(last_segment(parts.uri.path()).to_string()))?;
        parse_user_id(&raw).map(UserId)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}
