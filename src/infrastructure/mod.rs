//! 基础设施层

pub mod config;
pub mod logger;
pub mod system_info;
