//! 日志条目结构
//!
//! 条目是定长的纯数据结构，可以按值复制进出环形缓冲区，不需要堆分配。

use crate::config::MAX_LOG_MESSAGE_LENGTH;
use crate::level::LogLevel;
use core::fmt::{self, Write};

/// 单条日志
#[derive(Clone, Copy)]
pub struct LogEntry {
    level: LogLevel,
    context_id: usize,
    timestamp: usize,
    len: usize,
    message: [u8; MAX_LOG_MESSAGE_LENGTH],
}

impl LogEntry {
    /// 由格式化参数构造条目，超长消息在字符边界处截断
    pub fn from_args(
        level: LogLevel,
        context_id: usize,
        timestamp: usize,
        args: fmt::Arguments,
    ) -> Self {
        let mut writer = FixedWriter {
            buf: [0; MAX_LOG_MESSAGE_LENGTH],
            len: 0,
        };
        let _ = writer.write_fmt(args);
        Self {
            level,
            context_id,
            timestamp,
            len: writer.len,
            message: writer.buf,
        }
    }

    /// 日志级别
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 产生日志的执行流标识（未注册上下文提供者时为 0）
    pub fn context_id(&self) -> usize {
        self.context_id
    }

    /// 时间戳
    pub fn timestamp(&self) -> usize {
        self.timestamp
    }

    /// 消息文本
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.message[..self.len]).unwrap_or("")
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("level", &self.level)
            .field("context_id", &self.context_id)
            .field("timestamp", &self.timestamp)
            .field("message", &self.message())
            .finish()
    }
}

/// 写满即静默丢弃的定长缓冲区
struct FixedWriter {
    buf: [u8; MAX_LOG_MESSAGE_LENGTH],
    len: usize,
}

impl Write for FixedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MAX_LOG_MESSAGE_LENGTH - self.len;
        let mut end = s.len().min(room);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.buf[self.len..self.len + end].copy_from_slice(&s.as_bytes()[..end]);
        self.len += end;
        Ok(())
    }
}
