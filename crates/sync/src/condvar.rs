//! 条件变量
//!
//! 基于票号（ticket）的条件变量：每个等待者入队时领取一个递增票号，
//! 唤醒操作推进"已服务"水位，票号低于水位的等待者即被放行。
//!
//! 因此 `notify_one` 按入队顺序唤醒最早的等待者，`notify_all` 放行
//! 调用时刻之前入队的所有等待者。之后入队的等待者不受影响。
//!
//! # 入队与挂起分离
//!
//! [`Condvar::enqueue`] 与 [`Condvar::wait_ticket`] 可以分开调用：调用方可以在
//! 仍持有保护谓词的其它锁时入队，释放这些锁之后再挂起。只要唤醒方在同样的锁内
//! 调用 `notify_*`，就不会丢失唤醒。

use crate::{Backoff, SleepLock};
use core::sync::atomic::{AtomicUsize, Ordering};

/// 等待票据，由 [`Condvar::enqueue`] 发放
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket that is never waited on is silently skipped by notify_one"]
pub struct WaitTicket(usize);

/// 票号条件变量
#[derive(Debug)]
pub struct Condvar {
    /// 下一个发放的票号
    next: AtomicUsize,
    /// 票号小于该值的等待者已被唤醒
    served: AtomicUsize,
}

impl Condvar {
    /// 创建一个没有等待者的条件变量
    pub const fn new() -> Self {
        Self {
            next: AtomicUsize::new(0),
            served: AtomicUsize::new(0),
        }
    }

    /// 领取等待票据
    pub fn enqueue(&self) -> WaitTicket {
        WaitTicket(self.next.fetch_add(1, Ordering::AcqRel))
    }

    /// 票据是否已被唤醒
    pub fn is_notified(&self, ticket: WaitTicket) -> bool {
        self.served.load(Ordering::Acquire) > ticket.0
    }

    /// 释放 `lock` 并挂起，直到 `ticket` 被唤醒，然后重新获取 `lock` 再返回。
    ///
    /// # Panics
    /// 调用方未持有 `lock` 时 panic。
    pub fn wait_ticket(&self, ticket: WaitTicket, lock: &SleepLock) {
        if !lock.is_held_by_current() {
            panic!("condvar: wait without holding the associated lock");
        }
        lock.release();

        let mut backoff = Backoff::new();
        while !self.is_notified(ticket) {
            backoff.snooze();
        }

        lock.acquire();
    }

    /// 入队并等待，等价于 `wait_ticket(enqueue(), lock)`。
    ///
    /// 与所有条件变量一样，返回不代表谓词成立，调用方必须在循环中重新检查。
    pub fn wait(&self, lock: &SleepLock) {
        if !lock.is_held_by_current() {
            panic!("condvar: wait without holding the associated lock");
        }
        let ticket = self.enqueue();
        self.wait_ticket(ticket, lock);
    }

    /// 唤醒最早入队且尚未被唤醒的等待者（如果有）
    pub fn notify_one(&self) {
        let _ = self
            .served
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |served| {
                (served < self.next.load(Ordering::Acquire)).then_some(served + 1)
            });
    }

    /// 唤醒所有已入队的等待者
    pub fn notify_all(&self) {
        let target = self.next.load(Ordering::Acquire);
        self.served.fetch_max(target, Ordering::AcqRel);
    }

    /// 是否存在尚未被唤醒的等待者
    pub fn has_waiters(&self) -> bool {
        self.served.load(Ordering::Acquire) < self.next.load(Ordering::Acquire)
    }
}

impl Default for Condvar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_one_is_fifo() {
        let cv = Condvar::new();
        let first = cv.enqueue();
        let second = cv.enqueue();

        cv.notify_one();
        assert!(cv.is_notified(first));
        assert!(!cv.is_notified(second));
        assert!(cv.has_waiters());

        cv.notify_one();
        assert!(cv.is_notified(second));
        assert!(!cv.has_waiters());
    }

    #[test]
    fn test_notify_without_waiters_is_not_banked() {
        let cv = Condvar::new();
        cv.notify_one();
        cv.notify_all();

        let late = cv.enqueue();
        assert!(!cv.is_notified(late));
    }

    #[test]
    fn test_notify_all_releases_only_enqueued() {
        let cv = Condvar::new();
        let a = cv.enqueue();
        let b = cv.enqueue();
        cv.notify_all();
        let c = cv.enqueue();

        assert!(cv.is_notified(a));
        assert!(cv.is_notified(b));
        assert!(!cv.is_notified(c));
    }
}
