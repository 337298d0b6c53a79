//! 进程信息工具

use serde::Serialize;
use sysinfo::System;

/// 当前进程的内存占用（字节）
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MemoryUsage {
    pub rss: u64,
    #[serde(rename = "virtual")]
    pub virtual_memory: u64,
}

pub struct SystemInfo {
    system: System,
}

impl SystemInfo {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// 无法读取进程信息时返回全零
    pub fn process_memory(&mut self) -> MemoryUsage {
        let Ok(pid) = sysinfo::get_current_pid() else {
            return MemoryUsage::default();
        };

        self.system.refresh_process(pid);
        self.system
            .process(pid)
            .map(|p| MemoryUsage {
                rss: p.memory(),
                virtual_memory: p.virtual_memory(),
            })
            .unwrap_or_default()
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self::new()
    }
}
