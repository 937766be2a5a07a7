//! 捕获 klog 控制台输出

use std::sync::{Mutex, Once};

use klog::LogOutput;

/// 把控制台输出累积到内存中的 `LogOutput`
pub struct CaptureOutput {
    buf: Mutex<String>,
}

impl CaptureOutput {
    pub const fn new() -> Self {
        Self {
            buf: Mutex::new(String::new()),
        }
    }

    /// 取出并清空已捕获的内容
    pub fn take(&self) -> String {
        let mut buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buf)
    }
}

impl Default for CaptureOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl LogOutput for CaptureOutput {
    fn write_str(&self, s: &str) {
        self.buf
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_str(s);
    }
}

/// 全局捕获实例
pub static CAPTURE_OUTPUT: CaptureOutput = CaptureOutput::new();

static INSTALL: Once = Once::new();

/// 将 [`CAPTURE_OUTPUT`] 注册为 klog 的控制台输出，可重复调用
pub fn install() {
    INSTALL.call_once(|| unsafe { klog::register_log_output(&CAPTURE_OUTPUT) });
}
