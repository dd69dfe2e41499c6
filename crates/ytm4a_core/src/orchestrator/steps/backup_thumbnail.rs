//! Backup thumbnail step - keeps an uncropped copy for manual cropping.

use std::fs::{self, File, FileTimes};
use std::path::Path;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{display_name, Context, JobState, StepOutcome};

/// Copies `<id>.jpg` to `<id>_copy.jpg`, keeping the source timestamps.
pub struct BackupThumbnailStep;

impl BackupThumbnailStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BackupThumbnailStep {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy `src` to `dst` and carry over access and modification times.
fn copy_with_times(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst)?;

    let meta = fs::metadata(src)?;
    let mut times = FileTimes::new().set_modified(meta.modified()?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options().write(true).open(dst)?.set_times(times)
}

impl PipelineStep for BackupThumbnailStep {
    fn name(&self) -> &str {
        "Backup thumbnail"
    }

    fn description(&self) -> &str {
        "Keep an uncropped copy of the thumbnail"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.find_thumbnail().is_none() {
            return Err(StepError::file_not_found(
                ctx.thumbnail_path().display().to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let source = ctx.thumbnail_path();
        let backup = ctx.backup_path();

        copy_with_times(&source, &backup)
            .map_err(|e| StepError::io_error("copying thumbnail", e))?;

        ctx.logger.info(&format!(
            "Thumbnail '{}' copied as '{}' for manual cropping.",
            display_name(&source),
            display_name(&backup)
        ));
        state.backup = Some(backup);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        match &state.backup {
            Some(path) if path.is_file() => Ok(()),
            Some(path) => Err(StepError::file_not_found(path.display().to_string())),
            None => Err(StepError::invalid_output("Backup not recorded")),
        }
    }
}
