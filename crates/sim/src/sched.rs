//! 基于 std 线程的调度操作与日志上下文

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Once, OnceLock};
use std::time::Instant;

use klog::LogContextProvider;
use sync::SchedOps;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static THREAD_ID: usize = NEXT_ID.fetch_add(1, Ordering::Relaxed);
}

/// std 线程上的 `SchedOps`，同时为 klog 提供执行流标识和时间戳（微秒）
pub struct StdSched {
    epoch: OnceLock<Instant>,
}

impl StdSched {
    const fn new() -> Self {
        Self {
            epoch: OnceLock::new(),
        }
    }
}

impl SchedOps for StdSched {
    fn current_id(&self) -> usize {
        THREAD_ID.with(|id| *id)
    }

    fn yield_now(&self) {
        std::thread::yield_now();
    }
}

impl LogContextProvider for StdSched {
    fn context_id(&self) -> usize {
        THREAD_ID.with(|id| *id)
    }

    fn timestamp(&self) -> usize {
        let epoch = self.epoch.get_or_init(Instant::now);
        // 运行时间超出 usize 范围后时间戳饱和
        usize::try_from(epoch.elapsed().as_micros()).unwrap_or(usize::MAX)
    }
}

static STD_SCHED: StdSched = StdSched::new();
static INSTALL: Once = Once::new();

/// 注册 std 调度操作和日志上下文，可重复调用
pub fn install() {
    INSTALL.call_once(|| unsafe {
        sync::register_sched_ops(&STD_SCHED);
        klog::register_context_provider(&STD_SCHED);
    });
}
