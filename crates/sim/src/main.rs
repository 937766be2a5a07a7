//! `catmouse-sim` 命令行入口

use std::process::ExitCode;

use klog::LogLevel;
use sim::{SimConfig, USAGE};

fn main() -> ExitCode {
    let config = match SimConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("catmouse-sim: {}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    let console = match std::env::var("CATMOUSE_LOG").as_deref() {
        Ok("debug") => LogLevel::Debug,
        Ok("info") => LogLevel::Info,
        _ => LogLevel::Warning,
    };
    sim::logging::install(console);

    match sim::run(&config) {
        Ok(report) => {
            println!("{}", report);
            if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("catmouse-sim: {}", e);
            ExitCode::FAILURE
        }
    }
}
