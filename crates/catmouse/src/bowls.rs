//! 碗池
//!
//! 固定数量的碗，每个碗由一把独立的 [`SleepLock`] 保护；
//! 碗号从 1 开始编号（`1..=len`）。

use alloc::boxed::Box;
use alloc::vec::Vec;
use sync::SleepLock;

use crate::error::InitError;

/// 碗池，每个碗同一时刻最多被一个个体占用
#[derive(Debug)]
pub struct Bowls {
    locks: Box<[SleepLock]>,
}

impl Bowls {
    /// 分配 `count` 个碗
    pub fn new(count: usize) -> Result<Self, InitError> {
        if count == 0 {
            return Err(InitError::NoBowls);
        }

        let mut locks = Vec::new();
        locks
            .try_reserve_exact(count)
            .map_err(|_| InitError::OutOfMemory { bowls: count })?;
        locks.extend((0..count).map(|_| SleepLock::new()));

        Ok(Self {
            locks: locks.into_boxed_slice(),
        })
    }

    /// 碗的数量
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// 碗池是否为空（构造保证非空，恒为 false）
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// 碗号对应的锁
    ///
    /// # Panics
    /// `bowl` 不在 `1..=len` 范围内时 panic。
    pub fn lock_for(&self, bowl: usize) -> &SleepLock {
        match bowl.checked_sub(1).and_then(|index| self.locks.get(index)) {
            Some(lock) => lock,
            None => panic!("bowls: bowl {} out of range 1..={}", bowl, self.locks.len()),
        }
    }

    /// 占用碗，必要时阻塞
    pub fn acquire(&self, bowl: usize) {
        self.lock_for(bowl).acquire();
    }

    /// 释放碗，唤醒在该碗上等待的个体（无论物种）
    pub fn release(&self, bowl: usize) {
        self.lock_for(bowl).release();
    }

    /// 当前执行流是否占用着该碗
    pub fn is_held_by_current(&self, bowl: usize) -> bool {
        self.lock_for(bowl).is_held_by_current()
    }

    /// 碗是否被占用
    pub fn is_occupied(&self, bowl: usize) -> bool {
        self.lock_for(bowl).is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bowls_rejected() {
        assert_eq!(Bowls::new(0).unwrap_err(), InitError::NoBowls);
    }

    #[test]
    fn test_bowls_are_one_based() {
        let bowls = Bowls::new(3).unwrap();
        assert_eq!(bowls.len(), 3);
        assert!(!bowls.is_occupied(1));
        assert!(!bowls.is_occupied(3));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_bowl_zero_panics() {
        Bowls::new(2).unwrap().lock_for(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_bowl_past_end_panics() {
        Bowls::new(2).unwrap().lock_for(3);
    }
}
