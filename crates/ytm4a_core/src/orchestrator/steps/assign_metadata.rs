//! Assign metadata step - tags the audio file and embeds the cropped cover.
//!
//! Video info comes from the downloader's JSON dump. The thumbnail is
//! deleted only after the tagged file has been saved, so a failed save
//! leaves everything needed for a retry in place.

use std::fs;

use super::run_tool;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{display_name, Context, JobState, MetadataOutput, StepOutcome};
use crate::tagging::TrackMetadata;
use crate::tools::{info_args, parse_video_info, VideoInfo};

/// Writes title, artist, album, year, genre, numbering and cover art.
pub struct AssignMetadataStep;

impl AssignMetadataStep {
    pub fn new() -> Self {
        Self
    }

    fn fetch_info(&self, ctx: &Context) -> StepResult<VideoInfo> {
        let output = run_tool(
            ctx,
            &ctx.settings.tools.downloader,
            &info_args(ctx.video.url()),
            false,
        )?;
        let info = parse_video_info(&output.stdout)
            .map_err(|e| StepError::parse_error("video info", e.to_string()))?;

        ctx.logger.debug(&format!(
            "Video info: '{}' by '{}' ({})",
            info.title, info.author, info.publish_date
        ));
        Ok(info)
    }
}

impl Default for AssignMetadataStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for AssignMetadataStep {
    fn name(&self) -> &str {
        "Assign metadata"
    }

    fn description(&self) -> &str {
        "Write tags and cover artwork to the audio file"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let audio = ctx
            .find_audio()
            .map_err(|e| StepError::io_error("listing audio files", e))?;
        if audio.is_none() {
            return Err(StepError::file_not_found(format!(
                "audio file containing '{}'",
                ctx.video.id()
            )));
        }
        if ctx.find_thumbnail().is_none() {
            return Err(StepError::file_not_found(
                ctx.thumbnail_path().display().to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let audio_path = ctx
            .find_audio()
            .map_err(|e| StepError::io_error("listing audio files", e))?
            .ok_or_else(|| StepError::file_not_found(ctx.video.id()))?;
        let thumbnail_path = ctx.thumbnail_path();

        let info = self.fetch_info(ctx)?;
        let metadata = TrackMetadata::single(&info, ctx.settings.tagging.default_genre.as_str());

        let cover = fs::read(&thumbnail_path)
            .map_err(|e| StepError::io_error("reading thumbnail", e))?;

        let audio_name = display_name(&audio_path);
        ctx.tagger
            .write(&audio_path, &metadata, &cover)
            .map_err(|e| StepError::tag_write(&audio_name, e))?;
        ctx.logger
            .info(&format!("Track '{}' cover artwork set.", audio_name));

        fs::remove_file(&thumbnail_path)
            .map_err(|e| StepError::io_error("deleting thumbnail", e))?;
        ctx.logger.info(&format!(
            "Thumbnail '{}' deleted.",
            display_name(&thumbnail_path)
        ));

        state.metadata = Some(MetadataOutput {
            audio_path,
            title: metadata.title,
            artist: metadata.artist,
            year: metadata.year,
            thumbnail_removed: true,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        let metadata = state
            .metadata
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Metadata not recorded"))?;

        if !metadata.audio_path.is_file() {
            return Err(StepError::file_not_found(
                metadata.audio_path.display().to_string(),
            ));
        }
        if ctx.find_thumbnail().is_some() {
            return Err(StepError::invalid_output(format!(
                "Thumbnail '{}' still present after tagging",
                ctx.thumbnail_name()
            )));
        }
        Ok(())
    }
}
