//! 同步原语
//!
//! 向 catmouse 引擎提供阻塞式同步原语：
//! 自旋锁、睡眠锁（带持有者记录）、条件变量和计数信号量。
//!
//! # 调度依赖
//!
//! 此 crate 不直接依赖任何调度器，而是通过 `SchedOps` trait 抽象
//! "当前执行流是谁" 和 "让出 CPU" 两个操作。
//! 使用任何阻塞原语之前必须调用 `register_sched_ops` 注册实现。
//!
//! # 锁顺序
//!
//! 原语本身不做死锁检测（睡眠锁的重入除外）。需要嵌套持锁的调用方
//! 必须自行约定并遵守一致的获取顺序。

#![no_std]

mod condvar;
mod raw_spin_lock;
mod semaphore;
mod sleep_lock;
mod spin_lock;

pub use condvar::*;
pub use raw_spin_lock::*;
pub use semaphore::*;
pub use sleep_lock::*;
pub use spin_lock::*;

use core::sync::atomic::{AtomicUsize, Ordering};

/// 自旋多少次之后通过 `SchedOps::yield_now` 让出 CPU
pub const SPIN_LIMIT: usize = 64;

/// 调度相关操作的 trait
///
/// 由使用方（内核或宿主测试环境）实现并注册。
pub trait SchedOps: Send + Sync {
    /// 当前执行流的标识
    ///
    /// 必须非零，且在同一时刻不同执行流之间互不相同。
    fn current_id(&self) -> usize;

    /// 主动让出 CPU
    fn yield_now(&self);
}

/// 全局调度操作实例（存储 fat pointer 的两个部分）
static SCHED_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static SCHED_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册调度操作实现
///
/// 重复注册时以最后一次为准。
///
/// # Safety
/// 必须在任何阻塞原语被使用之前调用；注册期间不得有其它线程正在使用原语。
pub unsafe fn register_sched_ops(ops: &'static dyn SchedOps) {
    let ptr = ops as *const dyn SchedOps;
    // SAFETY: fat pointer 的布局是 (data, vtable)
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn SchedOps, (usize, usize)>(ptr) };
    SCHED_OPS_VTABLE.store(vtable, Ordering::Release);
    SCHED_OPS_DATA.store(data, Ordering::Release);
}

/// 是否已经注册了调度操作
pub fn sched_ops_registered() -> bool {
    SCHED_OPS_DATA.load(Ordering::Acquire) != 0
}

/// 获取调度操作实例
#[inline]
pub(crate) fn sched_ops() -> &'static dyn SchedOps {
    let data = SCHED_OPS_DATA.load(Ordering::Acquire);
    let vtable = SCHED_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        panic!("sync: SchedOps not registered, call register_sched_ops first");
    }
    // SAFETY: data 和 vtable 是通过 register_sched_ops 设置的有效指针
    unsafe { &*core::mem::transmute::<(usize, usize), *const dyn SchedOps>((data, vtable)) }
}

/// 当前执行流标识
#[inline]
pub(crate) fn current_id() -> usize {
    sched_ops().current_id()
}

/// 让出 CPU
#[inline]
pub(crate) fn yield_now() {
    sched_ops().yield_now();
}

/// 有界自旋：前 `SPIN_LIMIT` 次只做 `spin_loop` 提示，之后每次都让出 CPU。
pub(crate) struct Backoff {
    spins: usize,
}

impl Backoff {
    pub(crate) const fn new() -> Self {
        Self { spins: 0 }
    }

    pub(crate) fn snooze(&mut self) {
        if self.spins < SPIN_LIMIT {
            self.spins += 1;
            core::hint::spin_loop();
        } else {
            yield_now();
        }
    }
}
