mod app;
mod config;
mod effects;
mod logging;
mod services;
mod ui;

pub use app::run_app;
