//! 自旋锁封装
//!
//! 提供对数据的互斥访问的自旋锁类型，由 `lock_api` 基于 [`RawSpinLock`] 生成。

use crate::raw_spin_lock::RawSpinLock;

/// 提供对数据的互斥访问的自旋锁。
///
/// # 注意
/// SpinLock 不是可重入的。持有锁时再次获取同一把锁将导致死锁。
/// 临界区应尽量短小；需要长时间等待的场景请使用 [`SleepLock`](crate::SleepLock)
/// 配合 [`Condvar`](crate::Condvar)。
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;

/// SpinLock 的 RAII 保护器，离开作用域时自动释放锁。
pub type SpinLockGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLock, T>;
