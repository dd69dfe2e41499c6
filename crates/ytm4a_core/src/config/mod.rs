//! Configuration management for youtube-to-m4a.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Defaults for every key, so no file is required
//! - Atomic file writes (write to temp, then rename)
//!
//! # Example
//!
//! ```no_run
//! use ytm4a_core::config::ConfigManager;
//!
//! let mut config = ConfigManager::new("settings.toml");
//! config.load_or_default().unwrap();
//!
//! println!("Genre: {}", config.settings().tagging.default_genre);
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, DownloadSettings, FileSettings, LoggingSettings, Settings, TaggingSettings,
    ToolSettings,
};
