//! Crop thumbnail step - centers and crops the thumbnail to a square in place.

use crate::media::{crop_to_square, CropError};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{display_name, Context, CropOutput, JobState, StepOutcome};

/// Overwrites `<id>.jpg` with its centered square crop.
pub struct CropThumbnailStep;

impl CropThumbnailStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CropThumbnailStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for CropThumbnailStep {
    fn name(&self) -> &str {
        "Crop thumbnail"
    }

    fn description(&self) -> &str {
        "Crop the thumbnail to a centered square"
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
        let path = ctx.thumbnail_path();
        let crop_box = crop_to_square(&path)?;

        ctx.logger.debug(&format!(
            "Crop box {:?} ({}x{})",
            crop_box.as_tuple(),
            crop_box.width(),
            crop_box.height()
        ));
        ctx.logger
            .info(&format!("Thumbnail '{}' cropped.", display_name(&path)));

        state.crop = Some(CropOutput {
            path,
            crop_box: crop_box.as_tuple(),
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let crop = state
            .crop
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Crop not recorded"))?;

        let (width, height) =
            image::image_dimensions(&crop.path).map_err(|e| StepError::Image(CropError::from(e)))?;
        let (left, top, right, bottom) = crop.crop_box;

        if width != height || width != right - left || height != bottom - top {
            return Err(StepError::invalid_output(format!(
                "Cropped thumbnail is {}x{}, expected a {}x{} square",
                width,
                height,
                right - left,
                bottom - top
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, write_jpeg, FakeRunner, FakeTagger};
    use super::*;
    use crate::config::Settings;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn ctx(dir: &std::path::Path) -> Context {
        context(
            dir,
            Settings::default(),
            Arc::new(FakeRunner::simulated()),
            Arc::new(FakeTagger::default()),
        )
    }

    #[test]
    fn landscape_thumbnail_becomes_square() {
        let dir = tempdir().unwrap();
        write_jpeg(&dir.path().join("abc123.jpg"), 1920, 1080);
        let ctx = ctx(dir.path());
        let mut state = JobState::new("abc123");

        let step = CropThumbnailStep::new();
        step.validate_input(&ctx).unwrap();
        step.execute(&ctx, &mut state).unwrap();
        step.validate_output(&ctx, &state).unwrap();

        assert_eq!(state.crop.unwrap().crop_box, (420, 0, 1500, 1080));
        assert_eq!(
            image::image_dimensions(dir.path().join("abc123.jpg")).unwrap(),
            (1080, 1080)
        );
    }

    #[test]
    fn backup_is_left_untouched() {
        let dir = tempdir().unwrap();
        write_jpeg(&dir.path().join("abc123.jpg"), 640, 480);
        write_jpeg(&dir.path().join("abc123_copy.jpg"), 640, 480);
        let ctx = ctx(dir.path());
        let mut state = JobState::new("abc123");

        CropThumbnailStep::new()
            .execute(&ctx, &mut state)
            .unwrap();

        assert_eq!(
            image::image_dimensions(dir.path().join("abc123_copy.jpg")).unwrap(),
            (640, 480)
        );
    }

    #[test]
    fn undecodable_thumbnail_is_image_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("abc123.jpg"), b"<html>404</html>").unwrap();
        let ctx = ctx(dir.path());
        let mut state = JobState::new("abc123");

        assert!(matches!(
            CropThumbnailStep::new().execute(&ctx, &mut state),
            Err(StepError::Image(_))
        ));
        assert!(state.crop.is_none());
    }

    #[test]
    fn missing_crop_record_fails_output_validation() {
        let dir = tempdir().unwrap();
        let ctx = ctx(dir.path());
        let state = JobState::new("abc123");

        assert!(matches!(
            CropThumbnailStep::new().validate_output(&ctx, &state),
            Err(StepError::InvalidOutput(_))
        ));
    }
}
