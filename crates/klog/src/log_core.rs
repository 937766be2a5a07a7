//! 日志系统核心实现
//!
//! 该模块将所有日志状态和逻辑封装到一个单独的 `LogCore` 结构体中，
//! 既可作为全局单例，也可以独立实例化用于测试。

use super::buffer::LogBuffer;
use super::config::{DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL};
use super::entry::LogEntry;
use super::level::LogLevel;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

/// 核心日志系统
///
/// 封装了环形缓冲区和两个过滤阈值。所有方法都只使用原子操作，
/// 可以在线程之间共享而无需外部加锁。
pub struct LogCore {
    /// 用于日志存储的无锁环形缓冲区
    buffer: LogBuffer,

    /// 全局日志级别阈值（控制日志是否缓冲）
    global_level: AtomicU8,

    /// 控制台输出级别阈值（控制是否立即打印）
    console_level: AtomicU8,
}

impl LogCore {
    /// 使用默认日志级别创建实例，可用于 `static` 初始化
    pub const fn default() -> Self {
        Self {
            buffer: LogBuffer::new(),
            global_level: AtomicU8::new(DEFAULT_LOG_LEVEL as u8),
            console_level: AtomicU8::new(DEFAULT_CONSOLE_LEVEL as u8),
        }
    }

    /// 使用自定义日志级别创建实例
    ///
    /// # 示例
    ///
    /// ```rust
    /// use klog::{LogCore, LogLevel};
    ///
    /// let log = LogCore::new(LogLevel::Debug, LogLevel::Error);
    /// log._log(LogLevel::Info, format_args!("bowl {} ready", 1));
    /// assert_eq!(log._log_len(), 1);
    /// ```
    pub const fn new(global_level: LogLevel, console_level: LogLevel) -> Self {
        Self {
            buffer: LogBuffer::new(),
            global_level: AtomicU8::new(global_level as u8),
            console_level: AtomicU8::new(console_level as u8),
        }
    }

    /// 记录一条日志
    ///
    /// 1. 按全局级别过滤
    /// 2. 从已注册的上下文提供者收集执行流标识和时间戳
    /// 3. 写入缓冲区（满则丢弃并计数）
    /// 4. 达到控制台级别时立即输出
    pub fn _log(&self, level: LogLevel, args: fmt::Arguments) {
        if !self.is_level_enabled(level) {
            return;
        }

        let (context_id, timestamp) = match crate::get_context_provider() {
            Some(provider) => (provider.context_id(), provider.timestamp()),
            None => (0, 0),
        };

        let entry = LogEntry::from_args(level, context_id, timestamp, args);
        self.buffer.write(&entry);

        if self.is_console_level(level) {
            self.direct_print_entry(&entry);
        }
    }

    /// 从缓冲区读取下一个日志条目
    pub fn _read_log(&self) -> Option<LogEntry> {
        self.buffer.read()
    }

    /// 返回未读日志条目的数量
    pub fn _log_len(&self) -> usize {
        self.buffer.len()
    }

    /// 返回由于缓冲区满而丢弃的日志计数
    pub fn _log_dropped_count(&self) -> usize {
        self.buffer.dropped_count()
    }

    /// 设置全局日志级别阈值
    pub fn _set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前全局日志级别
    pub fn _get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Acquire))
    }

    /// 设置控制台输出级别阈值
    pub fn _set_console_level(&self, level: LogLevel) {
        self.console_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前控制台输出级别
    pub fn _get_console_level(&self) -> LogLevel {
        LogLevel::from_u8(self.console_level.load(Ordering::Acquire))
    }

    /// 检查日志级别是否启用 (全局过滤器)
    #[inline(always)]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.global_level.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn is_console_level(&self, level: LogLevel) -> bool {
        level as u8 <= self.console_level.load(Ordering::Acquire)
    }

    /// 通过已注册的 `LogOutput` 直接输出一条日志
    ///
    /// 格式必须与 [`format_log_entry`] 保持一致（外加换行）。
    fn direct_print_entry(&self, entry: &LogEntry) {
        if let Some(output) = crate::get_log_output() {
            let mut line = format_log_entry(entry);
            line.push('\n');
            output.write_str(&line);
        }
    }
}

/// 格式化日志条目为字符串（带 ANSI 颜色和上下文信息）
///
/// # 格式
/// ```text
/// <color_code>[LEVEL] [timestamp] [C<context>] message<reset>
/// ```
pub fn format_log_entry(entry: &LogEntry) -> alloc::string::String {
    alloc::format!(
        "{}{} [{:12}] [C{:3}] {}{}",
        entry.level().color_code(),
        entry.level().as_str(),
        entry.timestamp(),
        entry.context_id(),
        entry.message(),
        entry.level().reset_color_code()
    )
}
