//! 把 klog 的控制台输出接到标准输出

use std::io::Write;
use std::sync::Once;

use klog::{LogLevel, LogOutput};

struct StdoutOutput;

impl LogOutput for StdoutOutput {
    fn write_str(&self, s: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(s.as_bytes());
        let _ = out.flush();
    }
}

static STDOUT_OUTPUT: StdoutOutput = StdoutOutput;
static INSTALL: Once = Once::new();

/// 安装标准输出控制台和 `log` 门面，`level` 及更高级别的日志入缓冲区并立即打印
pub fn install(level: LogLevel) {
    crate::sched::install();
    INSTALL.call_once(|| {
        unsafe { klog::register_log_output(&STDOUT_OUTPUT) };
        // 已有其它 logger 时保留原 logger
        let _ = klog::init_facade(log::LevelFilter::Debug);
    });
    klog::set_global_level(level);
    klog::set_console_level(level);
}

/// 一次排空后 klog 缓冲区的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogStats {
    /// 排空时读出的条目数
    pub entries: usize,
    /// 缓冲区满时累计丢弃的条目数
    pub dropped: usize,
}

/// 读出并丢弃缓冲区中的全部条目
///
/// 条目在记录时已经打印到控制台，这里只统计数量，让下一次模拟从空缓冲区开始。
pub fn drain() -> LogStats {
    let mut entries = 0;
    while klog::read_log().is_some() {
        entries += 1;
    }
    LogStats {
        entries,
        dropped: klog::log_dropped_count(),
    }
}
