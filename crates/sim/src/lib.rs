//! 猫鼠模拟
//!
//! 为每只猫和每只老鼠各起一个线程，按轮次轮换碗，通过 [`catmouse::CatMouse`]
//! 进出，同时由 [`Referee`] 独立检查互斥约束。

pub mod config;
pub mod driver;
pub mod logging;
pub mod referee;
pub mod sched;

pub use config::{ConfigError, SimConfig, USAGE};
pub use driver::{SimError, SimReport, bowl_for, run};
pub use logging::LogStats;
pub use referee::Referee;
