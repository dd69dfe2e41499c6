//! Download audio step - fetches and transcodes the audio track with yt-dlp.

use super::{check_existing, run_tool};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{display_name, ArtifactOutput, Context, JobState, StepOutcome};
use crate::tools::audio_download_args;

/// Downloads the audio track into the working directory.
///
/// Existing audio for the video is kept or replaced according to
/// `download.skip_if_exists`. Caller passthrough arguments override the
/// default format and quality flags.
pub struct DownloadAudioStep;

impl DownloadAudioStep {
    pub fn new() -> Self {
        Self
    }

    fn find_audio(&self, ctx: &Context) -> StepResult<Option<std::path::PathBuf>> {
        ctx.find_audio()
            .map_err(|e| StepError::io_error("listing audio files", e))
    }
}

impl Default for DownloadAudioStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for DownloadAudioStep {
    fn name(&self) -> &str {
        "Download audio"
    }

    fn description(&self) -> &str {
        "Download and extract the audio track"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.settings.tools.downloader.trim().is_empty() {
            return Err(StepError::invalid_input("No downloader configured"));
        }
        if ctx.settings.files.audio_format().is_empty() {
            return Err(StepError::invalid_input("Audio extension is empty"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let existing = self.find_audio(ctx)?;
        if let Some(path) = check_existing(ctx, "Audio", existing)? {
            state.audio = Some(ArtifactOutput {
                path,
                downloaded: false,
            });
            return Ok(StepOutcome::Skipped("Audio re-download skipped.".to_string()));
        }

        let args = audio_download_args(
            ctx.video.url(),
            ctx.settings.files.audio_format(),
            &ctx.settings.download.audio_quality,
            &ctx.extra_args,
        );
        run_tool(ctx, &ctx.settings.tools.downloader, &args, true)?;

        state.audio = self.find_audio(ctx)?.map(|path| {
            ctx.logger
                .info(&format!("Audio '{}' downloaded.", display_name(&path)));
            ArtifactOutput {
                path,
                downloaded: true,
            }
        });

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        match &state.audio {
            Some(audio) if audio.path.is_file() => Ok(()),
            _ => Err(StepError::file_not_found(format!(
                "audio file containing '{}' ending with '{}'",
                ctx.video.id(),
                ctx.audio_extension()
            ))),
        }
    }
}
