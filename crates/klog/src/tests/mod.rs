// Unit tests for klog, run with host `cargo test`.

extern crate alloc;
extern crate std;

use crate::LogLevel;
use crate::log_core::LogCore;

/// Test-only logging helper targeting a local `LogCore`.
macro_rules! test_log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger._log($level, format_args!($($arg)*))
    };
}
