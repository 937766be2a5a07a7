//! 无锁环形缓冲区
//!
//! 有界多生产者队列：每个槽位带一个序号，生产者通过 CAS 抢占写位置，
//! 写入完成后发布序号；读者只在序号表明写入已完成时才取走条目。
//!
//! 缓冲区满时**丢弃新条目**并计数，不会覆盖尚未读取的旧条目。

use crate::config::LOG_BUFFER_CAPACITY;
use crate::entry::LogEntry;
use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

const MASK: usize = LOG_BUFFER_CAPACITY - 1;

/// 单个槽位
///
/// `stamp` 存储的是 "序号 - 槽位下标"，这样所有槽位都能以 0 常量初始化。
struct Slot {
    stamp: AtomicUsize,
    entry: UnsafeCell<MaybeUninit<LogEntry>>,
}

impl Slot {
    const fn new() -> Self {
        Self {
            stamp: AtomicUsize::new(0),
            entry: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// 日志环形缓冲区
pub struct LogBuffer {
    slots: [Slot; LOG_BUFFER_CAPACITY],
    /// 下一个写入位置
    writer: AtomicUsize,
    /// 下一个读取位置
    reader: AtomicUsize,
    /// 因缓冲区满而丢弃的条目数
    dropped: AtomicUsize,
}

// Safety: 槽位内容只在序号协议授予独占访问权时读写
unsafe impl Sync for LogBuffer {}

impl LogBuffer {
    /// 创建空缓冲区
    pub const fn new() -> Self {
        Self {
            slots: [const { Slot::new() }; LOG_BUFFER_CAPACITY],
            writer: AtomicUsize::new(0),
            reader: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    fn sequence(&self, index: usize) -> usize {
        self.slots[index]
            .stamp
            .load(Ordering::Acquire)
            .wrapping_add(index)
    }

    fn publish(&self, index: usize, seq: usize) {
        self.slots[index]
            .stamp
            .store(seq.wrapping_sub(index), Ordering::Release);
    }

    /// 写入一个条目，缓冲区满时返回 false 并增加丢弃计数
    pub fn write(&self, entry: &LogEntry) -> bool {
        let mut pos = self.writer.load(Ordering::Relaxed);
        loop {
            let index = pos & MASK;
            let diff = self.sequence(index).wrapping_sub(pos) as isize;
            if diff == 0 {
                match self.writer.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // Safety: CAS 成功后该槽位在本轮由当前生产者独占
                        unsafe { (*self.slots[index].entry.get()).write(*entry) };
                        self.publish(index, pos.wrapping_add(1));
                        return true;
                    }
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            } else {
                pos = self.writer.load(Ordering::Relaxed);
            }
        }
    }

    /// 取出最早的条目
    pub fn read(&self) -> Option<LogEntry> {
        let mut pos = self.reader.load(Ordering::Relaxed);
        loop {
            let index = pos & MASK;
            let diff = self.sequence(index).wrapping_sub(pos.wrapping_add(1)) as isize;
            if diff == 0 {
                match self.reader.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        // Safety: 序号表明生产者已完成写入，CAS 成功后由当前读者独占
                        let entry = unsafe { (*self.slots[index].entry.get()).assume_init_read() };
                        self.publish(index, pos.wrapping_add(LOG_BUFFER_CAPACITY));
                        return Some(entry);
                    }
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                return None;
            } else {
                pos = self.reader.load(Ordering::Relaxed);
            }
        }
    }

    /// 未读条目数
    pub fn len(&self) -> usize {
        let writer = self.writer.load(Ordering::Acquire);
        let reader = self.reader.load(Ordering::Acquire);
        writer.wrapping_sub(reader).min(LOG_BUFFER_CAPACITY)
    }

    /// 丢弃计数
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
