//! Download thumbnail step - saves `<id>.jpg` with the thumbnail fetcher.

use super::{check_existing, run_tool};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{ArtifactOutput, Context, JobState, StepOutcome};
use crate::tools::expand_template;

/// Fetches the video thumbnail into the working directory.
pub struct DownloadThumbnailStep;

impl DownloadThumbnailStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DownloadThumbnailStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for DownloadThumbnailStep {
    fn name(&self) -> &str {
        "Download thumbnail"
    }

    fn description(&self) -> &str {
        "Fetch the video thumbnail"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.settings.tools.thumbnail_fetcher.trim().is_empty() {
            return Err(StepError::invalid_input("No thumbnail fetcher configured"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        if let Some(path) = check_existing(ctx, "Thumbnail", ctx.find_thumbnail())? {
            state.thumbnail = Some(ArtifactOutput {
                path,
                downloaded: false,
            });
            return Ok(StepOutcome::Skipped(
                "Thumbnail re-download skipped.".to_string(),
            ));
        }

        let args = expand_template(
            &ctx.settings.tools.thumbnail_args,
            ctx.video.url(),
            ctx.video.id(),
        );
        run_tool(ctx, &ctx.settings.tools.thumbnail_fetcher, &args, true)?;

        state.thumbnail = ctx.find_thumbnail().map(|path| {
            ctx.logger
                .info(&format!("Thumbnail '{}' downloaded.", ctx.thumbnail_name()));
            ArtifactOutput {
                path,
                downloaded: true,
            }
        });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        match &state.thumbnail {
            Some(thumb) if thumb.path.is_file() => Ok(()),
            _ => Err(StepError::file_not_found(
                ctx.thumbnail_path().display().to_string(),
            )),
        }
    }
}
