//! # 用户目录服务
//!
//! 基于 Axum 的内存用户 CRUD 服务，分层结构：
//! - `app`: 路由、处理器、业务服务与内存存储
//! - `core`: 统一错误、响应信封、提取器、中间件
//! - `infrastructure`: 配置、日志、进程信息

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
pub use infrastructure::config::{AppConfig, Environment};
