//! youtube-to-m4a - Main entry point
//!
//! Parses the command line, loads settings, sets up logging and runs the
//! standard pipeline for a single video in the current directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use directories::ProjectDirs;

use ytm4a_core::config::{ConfigManager, Settings};
use ytm4a_core::logging::{init_tracing, JobLogger, LogCallback, LogConfig, MessagePrefix};
use ytm4a_core::models::VideoRef;
use ytm4a_core::orchestrator::{self, Context, PipelineError};

/// Download a YouTube video as a tagged .m4a with a square cover.
#[derive(Parser, Debug)]
#[command(name = "youtube-to-m4a", version, about)]
struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the settings file with all defaults filled in, then exit
    #[arg(long)]
    init_config: bool,

    /// Video URL (youtube.com/watch?v=... or youtu.be/...), then extra
    /// arguments passed to the downloader verbatim
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "URL [ARGS]"
    )]
    argv: Vec<String>,
}

impl Cli {
    /// The URL and the downloader arguments that follow it.
    fn url_and_args(&self) -> Option<(&str, &[String])> {
        self.argv
            .split_first()
            .map(|(url, rest)| (url.as_str(), rest))
    }
}

const MISSING_URL: &str = "URL not provided.";

/// Default config path: `<user config dir>/settings.toml`.
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "ytm4a", "youtube-to-m4a")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli, &mut io::stdout()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            println!("{}", MessagePrefix::Error.format(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Returns false when no URL was given or the job failed. Both have
/// already been reported on `out` or through the job logger.
fn run(cli: Cli, out: &mut dyn Write) -> Result<bool> {
    let config_path = cli.config.clone().or_else(default_config_path);

    if cli.init_config {
        let Some(path) = config_path else {
            bail!("Could not determine a config directory; pass --config <PATH>");
        };
        init_config(&path)?;
        writeln!(out, "Settings written to {}", path.display())?;
        return Ok(true);
    }

    let Some((url, extra_args)) = cli.url_and_args() else {
        writeln!(out, "{}", MessagePrefix::Error.format(MISSING_URL))?;
        return Ok(false);
    };

    let settings = load_settings(config_path.as_deref())?;
    init_tracing(settings.logging.level);
    tracing::debug!("youtube-to-m4a {}", ytm4a_core::version());

    let video = VideoRef::parse(url).map_err(PipelineError::from)?;
    let work_dir = std::env::current_dir()
        .map_err(|e| anyhow!("Cannot resolve the working directory: {}", e))?;

    let logger = build_logger(video.id(), &settings)
        .map_err(|e| PipelineError::setup_failed(video.id(), format!("logger: {}", e)))?;
    if let Some(path) = logger.log_path() {
        tracing::info!("Logging to {}", path.display());
    }

    let show_log = settings.logging.show_log;
    let ctx = Context::new(video, settings, work_dir, Arc::new(logger))
        .with_extra_args(extra_args.to_vec());

    if let Err(e) = orchestrator::run_job(&ctx) {
        tracing::error!("{}", e);
        // With show_log the job logger has already printed the error line.
        if !show_log {
            writeln!(out, "{}", MessagePrefix::Error.format(&e.to_string()))?;
        }
        return Ok(false);
    }

    Ok(true)
}

/// Load settings from `path`, or use defaults when there is no file.
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let mut manager = ConfigManager::new(path);
    let loaded = manager.load_or_default()?;
    if loaded {
        tracing::debug!("Loaded settings from {}", path.display());
    }
    Ok(manager.into_settings())
}

/// Write the settings file, keeping any values already in it.
fn init_config(path: &Path) -> Result<()> {
    let mut manager = ConfigManager::new(path);
    manager.load_or_default()?;
    manager.save()?;
    Ok(())
}

/// Build the per-video logger from the logging settings.
fn build_logger(video_id: &str, settings: &Settings) -> std::io::Result<JobLogger> {
    let logging = &settings.logging;

    let callback: Option<LogCallback> = if logging.show_log {
        Some(Box::new(|line: &str| println!("{}", line)))
    } else {
        None
    };

    let logs_folder = logging.logs_folder.trim();
    let log_dir = (!logs_folder.is_empty()).then(|| PathBuf::from(logs_folder));

    JobLogger::new(video_id, log_dir.as_deref(), LogConfig::from(logging), callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn url_and_passthrough_args() {
        let cli = Cli::try_parse_from([
            "youtube-to-m4a",
            "https://youtu.be/abc123",
            "--audio-quality",
            "5",
            "-f",
            "140",
        ])
        .unwrap();

        let (url, args) = cli.url_and_args().unwrap();
        assert_eq!(url, "https://youtu.be/abc123");
        assert_eq!(args, ["--audio-quality", "5", "-f", "140"]);
        assert!(!cli.init_config);
    }

    #[test]
    fn own_flags_after_url_are_passed_through() {
        let cli = Cli::try_parse_from([
            "youtube-to-m4a",
            "https://youtu.be/abc123",
            "--config",
            "x",
            "--init-config",
            "--version",
            "-h",
        ])
        .unwrap();

        assert!(cli.config.is_none());
        assert!(!cli.init_config);
        let (url, args) = cli.url_and_args().unwrap();
        assert_eq!(url, "https://youtu.be/abc123");
        assert_eq!(args, ["--config", "x", "--init-config", "--version", "-h"]);
    }

    #[test]
    fn version_after_url_is_not_handled_by_us() {
        let cli = Cli::try_parse_from(["youtube-to-m4a", "https://youtu.be/abc123", "--version"])
            .unwrap();
        assert_eq!(cli.url_and_args().unwrap().1, ["--version"]);
    }

    #[test]
    fn config_flag_before_url() {
        let cli = Cli::try_parse_from([
            "youtube-to-m4a",
            "--config",
            "/tmp/ytm4a.toml",
            "https://youtu.be/abc123",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/ytm4a.toml")));
        let (url, args) = cli.url_and_args().unwrap();
        assert_eq!(url, "https://youtu.be/abc123");
        assert!(args.is_empty());
    }

    #[test]
    fn url_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["youtube-to-m4a"]).unwrap();
        assert!(cli.url_and_args().is_none());
    }

    #[test]
    fn missing_url_fails_without_touching_files() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("settings.toml");
        let cli = Cli::try_parse_from([
            "youtube-to-m4a",
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();

        let mut out = Vec::new();
        assert!(!run(cli, &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "[ERROR] URL not provided.\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn init_config_writes_defaults() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("settings.toml");

        init_config(&config).unwrap();

        let settings = load_settings(Some(config.as_path())).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn no_config_dir_means_defaults() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn logger_without_folder_writes_no_file() {
        let mut settings = Settings::default();
        settings.logging.show_log = false;

        let logger = build_logger("abc123", &settings).unwrap();
        assert!(logger.log_path().is_none());
    }

    #[test]
    fn logger_with_folder_writes_job_log() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.logging.show_log = false;
        settings.logging.logs_folder = dir.path().display().to_string();

        let logger = build_logger("abc123", &settings).unwrap();
        assert_eq!(logger.log_path(), Some(dir.path().join("abc123.log").as_path()));
    }
}
