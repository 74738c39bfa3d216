//! 三轴投票边缘提取的消融实验.
//!
//! 环境变量 `VOTE3_SIDE` 和 `VOTE3_REPEAT` 分别控制体模边长与每个配置的重复次数,
//! `RUST_LOG` 控制日志级别.

mod algos;
mod result;
mod runner;

use simple_logger::SimpleLogger;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("logger init error: {e}");
    }

    let result = match runner::run() {
        Ok(r) => r,
        Err(e) => {
            log::error!("ablation failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = result.analyze() {
        log::error!("report failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
