//! 初始化错误类型
//!
//! 运行期的误用（越界的碗号、重复离开等）属于调用方的程序错误，直接 panic；
//! 只有初始化阶段的失败以 `Result` 返回。

use core::fmt;

/// 引擎初始化失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// 碗的数量为 0
    NoBowls,
    /// 为碗锁分配内存失败
    OutOfMemory {
        /// 请求的碗数
        bowls: usize,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NoBowls => f.write_str("bowl pool must contain at least one bowl"),
            InitError::OutOfMemory { bowls } => {
                write!(f, "out of memory allocating locks for {} bowls", bowls)
            }
        }
    }
}

impl core::error::Error for InitError {}
