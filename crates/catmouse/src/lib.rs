//! 猫鼠同步引擎
//!
//! 在固定数量的碗之间仲裁两个物种（猫与老鼠）的访问：
//!
//! - **碗互斥**：每个碗同一时刻最多一个个体
//! - **物种互斥**：有猫在进食时没有老鼠在进食，反之亦然
//! - **不饿死**：一个物种的进食者全部离开、且本物种没有等待者时，
//!   floor 交给正在等待的另一物种
//!
//! # 组件
//!
//! - [`Bowls`] - 碗池，每个碗一把 `SleepLock`
//! - [`ClassCounters`] / [`Snapshot`] - 物种计数器与 floor
//! - `handoff` - 每个物种一个条件变量
//! - [`CatMouse`] - 准入控制器
//!
//! # 调度依赖
//!
//! 阻塞原语来自 `sync` crate，使用前必须调用 `sync::register_sched_ops`。

#![no_std]

extern crate alloc;

mod bowls;
mod controller;
mod error;
mod handoff;
mod species;
mod state;

pub use bowls::Bowls;
pub use controller::CatMouse;
pub use error::InitError;
pub use species::Species;
pub use state::{ClassCounters, Snapshot};
