//! 用户管理

pub mod extract;
pub mod handler;
pub mod model;
pub mod seed;
pub mod service;
pub mod store;
pub mod validation;
