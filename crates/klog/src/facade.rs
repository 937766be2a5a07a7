//! `log` crate 桥接
//!
//! 库 crate 统一使用 `log::info!` 等宏记录日志，不直接依赖 klog；
//! 宿主程序调用 [`init_facade`] 后，这些记录会进入 klog 的全局缓冲区。

use crate::LogLevel;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// 把 `log` 记录转发给 klog 全局实例的 `Log` 实现
pub struct KlogFacade;

impl Log for KlogFacade {
    fn enabled(&self, metadata: &Metadata) -> bool {
        crate::is_level_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        crate::log_impl(
            LogLevel::from(record.level()),
            format_args!("{}: {}", record.target(), record.args()),
        );
    }

    fn flush(&self) {}
}

static FACADE: KlogFacade = KlogFacade;

/// 安装 klog 作为 `log` 的全局后端
///
/// `max` 是 `log` 侧的最大级别；最终是否入缓冲区仍取决于 klog 的全局级别。
/// 只能成功调用一次，之后的调用返回 `SetLoggerError`。
pub fn init_facade(max: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&FACADE)?;
    log::set_max_level(max);
    Ok(())
}
