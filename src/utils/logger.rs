use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Our crate logs at Info (Debug when `verbose`); dependencies only at Warn. `RUST_LOG` still applies.
/// Lines logged from a stage thread carry the stage name.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let result = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let stage = std::thread::current()
                .name()
                .and_then(|n| n.strip_prefix("stage-"))
                .map(|s| format!(" {}", s.magenta()))
                .unwrap_or_default();
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        _ => "ERROR".red(),
                    };
                    format!("[{} {}{}] {}", name.cyan(), level_str, stage, record.args())
                }
                _ => format!("[{}{}] {}", name.cyan(), stage, record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
    if result.is_err() {
        log::debug!("logger already initialized");
    }
}
