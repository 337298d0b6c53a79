//! 日志基础设施

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "user_directory=debug,tower_http=info";

pub struct Logger;

impl Logger {
    /// 按 `RUST_LOG` 初始化全局订阅者，`LOG_FORMAT=json` 时输出 JSON 行
    pub fn init() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if json {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .json()
                .init();
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}
