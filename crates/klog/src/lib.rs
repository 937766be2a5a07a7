//! 内核风格日志子系统
//!
//! 类似 Linux printk 的日志系统：日志先按级别过滤，然后写入**无锁环形缓冲区**，
//! 达到控制台级别的日志同时立即输出。
//!
//! # 组件
//!
//! - `buffer` - 有界无锁环形缓冲区（满时丢弃新条目并计数）
//! - `config` - 配置常量（缓冲区容量、消息长度、默认级别）
//! - `log_core` - 核心日志实现 [`LogCore`]
//! - `entry` - 定长日志条目 [`LogEntry`]
//! - `level` - 日志级别 [`LogLevel`]
//! - [`macros`] - `pr_info!`、`pr_err!` 等日志宏
//! - [`facade`] - 把 `log` crate 的记录转发到本系统
//!
//! # 架构解耦
//!
//! - **LogContextProvider**：提供执行流标识和时间戳
//! - **LogOutput**：提供控制台输出能力
//!
//! 使用方在启动时注册这些 trait 的实现；未注册时上下文为 0，且不做控制台输出。

#![no_std]

extern crate alloc;

mod buffer;
mod config;
mod entry;
pub mod facade;
mod level;
mod log_core;
pub mod macros;

#[cfg(test)]
mod tests;

pub use config::{
    DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, LOG_BUFFER_CAPACITY, MAX_LOG_MESSAGE_LENGTH,
};
pub use entry::LogEntry;
pub use facade::{KlogFacade, init_facade};
pub use level::LogLevel;
pub use log_core::{LogCore, format_log_entry};

use core::sync::atomic::{AtomicPtr, Ordering};

// ========== Trait 定义 ==========

/// 日志上下文提供者
pub trait LogContextProvider: Send + Sync {
    /// 当前执行流标识
    fn context_id(&self) -> usize;
    /// 当前时间戳
    fn timestamp(&self) -> usize;
}

/// 日志输出
pub trait LogOutput: Send + Sync {
    /// 输出字符串到控制台
    fn write_str(&self, s: &str);
}

// ========== 全局注册机制 ==========

/// trait object 胖指针的两个部分
struct DynPtr {
    data: AtomicPtr<()>,
    vtable: AtomicPtr<()>,
}

impl DynPtr {
    const fn new() -> Self {
        Self {
            data: AtomicPtr::new(core::ptr::null_mut()),
            vtable: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    fn store(&self, (data, vtable): (*mut (), *mut ())) {
        self.vtable.store(vtable, Ordering::Release);
        self.data.store(data, Ordering::Release);
    }

    fn load(&self) -> Option<(*mut (), *mut ())> {
        let data = self.data.load(Ordering::Acquire);
        let vtable = self.vtable.load(Ordering::Acquire);
        (!data.is_null() && !vtable.is_null()).then_some((data, vtable))
    }
}

static CONTEXT_PROVIDER: DynPtr = DynPtr::new();
static LOG_OUTPUT: DynPtr = DynPtr::new();

/// 注册日志上下文提供者
///
/// # Safety
///
/// - 注册期间不得有其它线程正在记录日志
/// - 重复注册时以最后一次为准
pub unsafe fn register_context_provider(provider: &'static dyn LogContextProvider) {
    let ptr: *const dyn LogContextProvider = provider;
    CONTEXT_PROVIDER.store(unsafe { core::mem::transmute::<_, (*mut (), *mut ())>(ptr) });
}

/// 注册日志输出
///
/// # Safety
///
/// 同 [`register_context_provider`]。
pub unsafe fn register_log_output(output: &'static dyn LogOutput) {
    let ptr: *const dyn LogOutput = output;
    LOG_OUTPUT.store(unsafe { core::mem::transmute::<_, (*mut (), *mut ())>(ptr) });
}

pub(crate) fn get_context_provider() -> Option<&'static dyn LogContextProvider> {
    let parts = CONTEXT_PROVIDER.load()?;
    // Safety: 指针由 register_context_provider 设置，保证有效
    Some(unsafe { core::mem::transmute::<(*mut (), *mut ()), &'static dyn LogContextProvider>(parts) })
}

pub(crate) fn get_log_output() -> Option<&'static dyn LogOutput> {
    let parts = LOG_OUTPUT.load()?;
    // Safety: 指针由 register_log_output 设置，保证有效
    Some(unsafe { core::mem::transmute::<(*mut (), *mut ()), &'static dyn LogOutput>(parts) })
}

// ========== 全局单例 ==========

static GLOBAL_LOG: LogCore = LogCore::default();

// ========== 公共 API ==========

/// 核心日志实现（由宏调用）
#[doc(hidden)]
pub fn log_impl(level: LogLevel, args: core::fmt::Arguments) {
    GLOBAL_LOG._log(level, args);
}

/// 检查日志级别是否启用（由宏调用）
#[doc(hidden)]
pub fn is_level_enabled(level: LogLevel) -> bool {
    GLOBAL_LOG.is_level_enabled(level)
}

/// 从缓冲区读取下一个日志条目
pub fn read_log() -> Option<LogEntry> {
    GLOBAL_LOG._read_log()
}

/// 返回未读日志条目的数量
pub fn log_len() -> usize {
    GLOBAL_LOG._log_len()
}

/// 返回已丢弃日志的计数
pub fn log_dropped_count() -> usize {
    GLOBAL_LOG._log_dropped_count()
}

/// 设置全局日志级别阈值
pub fn set_global_level(level: LogLevel) {
    GLOBAL_LOG._set_global_level(level);
}

/// 获取当前全局日志级别
pub fn get_global_level() -> LogLevel {
    GLOBAL_LOG._get_global_level()
}

/// 设置控制台输出级别阈值
pub fn set_console_level(level: LogLevel) {
    GLOBAL_LOG._set_console_level(level);
}

/// 获取当前控制台输出级别
pub fn get_console_level() -> LogLevel {
    GLOBAL_LOG._get_console_level()
}
