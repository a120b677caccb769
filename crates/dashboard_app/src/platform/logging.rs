//! File logging for the dashboard binary.
//!
//! The terminal belongs to the UI while the dashboard runs, so every record
//! goes to `./dashboard.log` in the working directory.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

pub const LOG_PATH: &str = "./dashboard.log";

/// Starts logging to `path`. Without a writable file the dashboard runs
/// unlogged.
pub fn initialize(path: &Path) {
    let Some(file) = create_log_file(path) else {
        return;
    };
    let _ = WriteLogger::init(level(), build_config(), file);
}

fn level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn build_config() -> Config {
    // reqwest/hyper internals are noisy at debug level.
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("rustls")
        .build()
}

/// Truncates any log left by a previous run.
fn create_log_file(path: &Path) -> Option<File> {
    match File::create(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Warning: could not create log file {:?}: {}", path, err);
            None
        }
    }
}
