//! 计数信号量
//!
//! 经典的 P/V 信号量：`down` 在计数为零时阻塞，`up` 增加计数。

use crate::Backoff;
use core::sync::atomic::{AtomicUsize, Ordering};

/// 计数信号量
#[derive(Debug)]
pub struct Semaphore {
    count: AtomicUsize,
}

impl Semaphore {
    /// 以给定初始计数创建信号量
    pub const fn new(count: usize) -> Self {
        Self {
            count: AtomicUsize::new(count),
        }
    }

    /// P 操作：计数为零时阻塞，否则将计数减一
    pub fn down(&self) {
        let mut backoff = Backoff::new();
        while !self.try_down() {
            backoff.snooze();
        }
    }

    /// 非阻塞的 P 操作，成功时返回 true
    pub fn try_down(&self) -> bool {
        self.count
            .fetch_update(Ordering::Acquire, Ordering::Relaxed, |count| {
                count.checked_sub(1)
            })
            .is_ok()
    }

    /// V 操作：将计数加一
    pub fn up(&self) {
        self.count.fetch_add(1, Ordering::Release);
    }

    /// 当前计数 (仅用于调试/测试)
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_down_respects_count() {
        let sem = Semaphore::new(2);
        assert!(sem.try_down());
        assert!(sem.try_down());
        assert!(!sem.try_down());
        assert_eq!(sem.count(), 0);

        sem.up();
        assert_eq!(sem.count(), 1);
        assert!(sem.try_down());
    }
}
