//! 睡眠锁
//!
//! 带持有者记录的互斥锁。与自旋锁不同，竞争者会通过 `SchedOps::yield_now`
//! 让出 CPU，适合持锁时间不可预知（例如持锁期间还要在条件变量上等待）的场景。
//!
//! 睡眠锁不包装数据：它保护的是一个"资源"，而不是一块内存，
//! 因此提供显式的 `acquire`/`release`，以便与 [`Condvar`](crate::Condvar) 配合。

use crate::{Backoff, current_id};
use core::sync::atomic::{AtomicUsize, Ordering};

/// 空闲状态下的持有者标识
const NO_OWNER: usize = 0;

/// 不可重入、记录持有者的睡眠锁
///
/// 以下情况视为调用方的程序错误，直接 panic：
/// - 持有者再次 `acquire` 同一把锁（必然死锁）
/// - 非持有者调用 `release`
#[derive(Debug)]
pub struct SleepLock {
    owner: AtomicUsize,
}

impl SleepLock {
    /// 创建一个空闲的睡眠锁
    pub const fn new() -> Self {
        Self {
            owner: AtomicUsize::new(NO_OWNER),
        }
    }

    /// 获取锁，必要时阻塞直到锁空闲
    pub fn acquire(&self) {
        let me = current_id();
        if self.owner.load(Ordering::Relaxed) == me {
            panic!("sleep_lock: acquire by current holder {} would deadlock", me);
        }

        let mut backoff = Backoff::new();
        while self
            .owner
            .compare_exchange_weak(NO_OWNER, me, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            backoff.snooze();
        }
    }

    /// 尝试获取锁，锁被占用时立即返回 false
    pub fn try_acquire(&self) -> bool {
        let me = current_id();
        self.owner
            .compare_exchange(NO_OWNER, me, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// 释放锁
    ///
    /// # Panics
    /// 当前执行流不是持有者时 panic。
    pub fn release(&self) {
        let me = current_id();
        if self
            .owner
            .compare_exchange(me, NO_OWNER, Ordering::Release, Ordering::Relaxed)
            .is_err()
        {
            panic!(
                "sleep_lock: release by {} but holder is {}",
                me,
                self.owner.load(Ordering::Relaxed)
            );
        }
    }

    /// 当前执行流是否持有该锁
    pub fn is_held_by_current(&self) -> bool {
        self.owner.load(Ordering::Relaxed) == current_id()
    }

    /// 锁是否被占用 (仅用于调试/测试)
    pub fn is_locked(&self) -> bool {
        self.owner.load(Ordering::Relaxed) != NO_OWNER
    }

    /// 获取锁，并返回离开作用域时自动释放的保护器
    pub fn lock(&self) -> SleepLockGuard<'_> {
        self.acquire();
        SleepLockGuard { lock: self }
    }
}

impl Default for SleepLock {
    fn default() -> Self {
        Self::new()
    }
}

/// [`SleepLock`] 的 RAII 保护器
#[derive(Debug)]
pub struct SleepLockGuard<'a> {
    lock: &'a SleepLock,
}

impl SleepLockGuard<'_> {
    /// 被保护的锁，供 [`Condvar::wait`](crate::Condvar::wait) 使用
    pub fn lock(&self) -> &SleepLock {
        self.lock
    }
}

impl Drop for SleepLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
