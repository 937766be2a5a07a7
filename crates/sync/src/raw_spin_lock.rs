//! 自旋锁实现
//!
//! 基于原子操作实现自旋锁机制，并实现 `lock_api::RawMutex`，
//! 由 `lock_api` 负责数据封装和 RAII 保护器。

use crate::Backoff;
use core::sync::atomic::{AtomicBool, Ordering};
use lock_api::{GuardSend, RawMutex};

/// 原始自旋锁，只负责互斥，不持有数据。
///
/// 不可重入 (即同一执行流不能嵌套获取同一把锁)。
/// 竞争时先自旋，超过 [`SPIN_LIMIT`](crate::SPIN_LIMIT) 次后让出 CPU。
///
/// # 示例
/// ```ignore
/// let lock: SpinLock<usize> = SpinLock::new(0);
/// {
///   let mut guard = lock.lock(); // 获取锁
///   *guard += 1;
/// } // 离开作用域，自动释放锁
/// ```
#[derive(Debug)]
pub struct RawSpinLock {
    lock: AtomicBool,
}

impl RawSpinLock {
    /// 创建一个新的 RawSpinLock 实例。
    pub const fn new() -> Self {
        RawSpinLock {
            lock: AtomicBool::new(false),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock::new();

    type GuardMarker = GuardSend;

    fn lock(&self) {
        let mut backoff = Backoff::new();
        while self
            .lock
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // 只读等待，避免在竞争时反复抢占缓存行
            while self.lock.load(Ordering::Relaxed) {
                backoff.snooze();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.lock.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }
}
