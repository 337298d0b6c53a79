//! 配置基础设施
//!
//! 所有配置来自环境变量（启动时先加载 `.env`），缺省值见 [`AppConfig::default`]。

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

/// 运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    /// 未识别的值按 production 处理
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn exposes_error_details(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub service_version: String,
    pub environment: Environment,
    pub seed_sample_data: bool,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            service_name: "User Directory API".into(),
            service_version: env!("CARGO_PKG_VERSION").into(),
            environment: Environment::Development,
            seed_sample_data: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置，便于测试时不修改进程环境变量
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", v))?,
            None => defaults.port,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse::<u64>().with_context(|| {
                format!("REQUEST_TIMEOUT_SECS must be a whole number, got '{}'", v)
            })?),
            None => defaults.request_timeout,
        };

        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(v) => parse_flag(&v)
                .with_context(|| format!("SEED_SAMPLE_DATA must be true or false, got '{}'", v))?,
            None => defaults.seed_sample_data,
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port,
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: lookup("SERVICE_VERSION").unwrap_or(defaults.service_version),
            environment: lookup("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(defaults.environment),
            seed_sample_data,
            request_timeout,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{}'", other),
    }
}
