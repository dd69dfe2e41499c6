//! Pipeline step implementations.
//!
//! Each step handles one phase of turning a video URL into a tagged
//! `.m4a` file with a square cover.

mod assign_metadata;
mod backup_thumbnail;
mod crop_thumbnail;
mod download_audio;
mod download_thumbnail;

#[cfg(test)]
pub(crate) mod test_support;

use std::fs;
use std::path::PathBuf;

pub use assign_metadata::AssignMetadataStep;
pub use backup_thumbnail::BackupThumbnailStep;
pub use crop_thumbnail::CropThumbnailStep;
pub use download_audio::DownloadAudioStep;
pub use download_thumbnail::DownloadThumbnailStep;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::types::{display_name, Context};
use crate::tools::{format_command, CommandOutput};

/// Run an external tool in the working directory.
///
/// Output lines go to the logger's tail buffer. A non-zero exit shows the
/// tail and becomes `CommandFailed`. On success, `WARNING:` lines from
/// stderr are surfaced as warnings. Set `log_stdout` to false for tools
/// whose stdout is data rather than progress.
pub(crate) fn run_tool(
    ctx: &Context,
    program: &str,
    args: &[String],
    log_stdout: bool,
) -> StepResult<CommandOutput> {
    ctx.logger.command(&format_command(program, args));

    let output = ctx
        .runner
        .run(program, args, &ctx.work_dir)
        .map_err(|e| StepError::io_error(format!("executing {}", program), e))?;

    if log_stdout {
        for line in output.stdout.lines() {
            ctx.logger.output_line(line, false);
        }
    }
    for line in output.stderr.lines() {
        ctx.logger.output_line(line, true);
    }

    if !output.success() {
        ctx.logger.show_tail(&format!("{} output", program));
        return Err(StepError::command_failed(
            program,
            output.exit_code,
            last_lines(&output.stderr, 5),
        ));
    }

    for warning in output
        .stderr
        .lines()
        .filter_map(|line| line.strip_prefix("WARNING:"))
    {
        ctx.logger.warn(warning.trim());
    }

    Ok(output)
}

/// Last `count` non-empty lines of tool output.
fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}

/// Apply the skip/overwrite policy to an artifact that may already exist.
///
/// Returns the path to keep when the artifact must not be fetched again.
/// Otherwise the old file has been removed and `None` is returned.
pub(crate) fn check_existing(
    ctx: &Context,
    kind: &str,
    existing: Option<PathBuf>,
) -> StepResult<Option<PathBuf>> {
    let Some(path) = existing else {
        return Ok(None);
    };

    let name = display_name(&path);
    ctx.logger
        .info(&format!("{} '{}' already exists.", kind, name));

    if ctx.settings.download.skip_if_exists {
        return Ok(Some(path));
    }

    fs::remove_file(&path).map_err(|e| StepError::io_error(format!("removing {}", name), e))?;
    ctx.logger.info(&format!(
        "{} '{}' removed. Proceeding to re-download.",
        kind, name
    ));
    Ok(None)
}
