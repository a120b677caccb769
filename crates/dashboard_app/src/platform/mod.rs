mod app;
mod config;
mod effects;
mod keys;
mod logging;
mod ui;

pub use app::run_app;
