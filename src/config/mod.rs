//! Configuration loading for the storybook reader.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so the window can still open.

pub(crate) mod defaults;
mod io;
mod models;

pub use io::load_config;
pub use models::{AppConfig, HighlightColor, LogLevel, ThemeMode};
