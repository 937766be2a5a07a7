//! Mock 实现模块

pub mod log;
pub mod sched;
