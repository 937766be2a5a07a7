//! 测试支持 crate
//!
//! 为宿主机上的 `cargo test` 提供 Mock 实现：
//! - [`mock::sched`]：基于 std 线程的 `SchedOps`，带每线程让出计数
//! - [`mock::log`]：捕获 klog 控制台输出

pub mod mock;
