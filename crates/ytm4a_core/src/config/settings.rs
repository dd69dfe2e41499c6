//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field has a serde default, so a partial file (or no file at all)
//! yields the built-in behaviour.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Audio download settings.
    #[serde(default)]
    pub download: DownloadSettings,

    /// Tag values that are not derived from the video.
    #[serde(default)]
    pub tagging: TaggingSettings,

    /// File extensions for the produced artifacts.
    #[serde(default)]
    pub files: FileSettings,

    /// External tool commands.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Audio acquisition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Value passed as `--audio-quality` (0 = best VBR).
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,

    /// Keep artifacts that already exist instead of re-fetching them.
    #[serde(default)]
    pub skip_if_exists: bool,
}

fn default_audio_quality() -> String {
    "0".to_string()
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            audio_quality: default_audio_quality(),
            skip_if_exists: false,
        }
    }
}

/// Tagging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggingSettings {
    /// Genre written to every track.
    #[serde(default = "default_genre")]
    pub default_genre: String,
}

fn default_genre() -> String {
    "J-Pop".to_string()
}

impl Default for TaggingSettings {
    fn default() -> Self {
        Self {
            default_genre: default_genre(),
        }
    }
}

/// Artifact file extensions (with leading dot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,

    #[serde(default = "default_image_extension")]
    pub image_extension: String,
}

fn default_audio_extension() -> String {
    ".m4a".to_string()
}

fn default_image_extension() -> String {
    ".jpg".to_string()
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            audio_extension: default_audio_extension(),
            image_extension: default_image_extension(),
        }
    }
}

impl FileSettings {
    /// Audio container format name as the downloader expects it (`m4a`).
    pub fn audio_format(&self) -> &str {
        self.audio_extension.trim_start_matches('.')
    }
}

/// External tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Audio downloader executable (also used for video info).
    #[serde(default = "default_downloader")]
    pub downloader: String,

    /// Thumbnail fetcher executable.
    #[serde(default = "default_thumbnail_fetcher")]
    pub thumbnail_fetcher: String,

    /// Arguments for the thumbnail fetcher. `{url}` and `{id}` are substituted.
    #[serde(default = "default_thumbnail_args")]
    pub thumbnail_args: Vec<String>,
}

fn default_downloader() -> String {
    "yt-dlp".to_string()
}

fn default_thumbnail_fetcher() -> String {
    "pythumb".to_string()
}

fn default_thumbnail_args() -> Vec<String> {
    vec!["{url}".to_string()]
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            downloader: default_downloader(),
            thumbnail_fetcher: default_thumbnail_fetcher(),
            thumbnail_args: default_thumbnail_args(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Print progress lines to the console.
    #[serde(default = "default_true")]
    pub show_log: bool,

    /// Minimum level for console and file output.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact log format (tool output only kept in the tail buffer).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Prefix each line with a timestamp.
    #[serde(default)]
    pub show_timestamps: bool,

    /// Number of tool output lines to show on error.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Folder for per-video log files. Empty disables file logging.
    #[serde(default)]
    pub logs_folder: String,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            show_log: true,
            level: LogLevel::default(),
            compact: true,
            show_timestamps: false,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            logs_folder: String::new(),
        }
    }
}

/// Config sections for targeted serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Download,
    Tagging,
    Files,
    Tools,
    Logging,
}

impl ConfigSection {
    /// All sections in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Download,
        ConfigSection::Tagging,
        ConfigSection::Files,
        ConfigSection::Tools,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Download => "download",
            ConfigSection::Tagging => "tagging",
            ConfigSection::Files => "files",
            ConfigSection::Tools => "tools",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Download => "Audio download options",
            ConfigSection::Tagging => "Tag values not taken from the video",
            ConfigSection::Files => "Artifact file extensions",
            ConfigSection::Tools => "External tools",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
