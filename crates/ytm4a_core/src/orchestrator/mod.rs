//! Pipeline orchestrator for turning one video URL into a tagged `.m4a`.
//!
//! Each run is a fixed sequence of steps that validate, execute, and
//! record their results. The first failing step aborts the run.
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!     ├── Step: Download audio
//!     ├── Step: Download thumbnail
//!     ├── Step: Backup thumbnail
//!     ├── Step: Crop thumbnail
//!     └── Step: Assign metadata
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ytm4a_core::orchestrator::{create_standard_pipeline, Context, JobState};
//!
//! let video = VideoRef::parse("https://youtu.be/abc123")?;
//! let ctx = Context::new(video, settings, work_dir, logger);
//! let mut state = JobState::new(&ctx.job_name);
//!
//! let result = create_standard_pipeline().run(&ctx, &mut state)?;
//! println!("Completed: {:?}", result.steps_completed);
//! ```

mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{
    AssignMetadataStep, BackupThumbnailStep, CropThumbnailStep, DownloadAudioStep,
    DownloadThumbnailStep,
};
pub use types::{ArtifactOutput, Context, CropOutput, JobState, MetadataOutput, StepOutcome};

/// Create a standard pipeline with all steps in the correct order.
///
/// 1. Download audio - yt-dlp audio extraction
/// 2. Download thumbnail - fetch `<id>.jpg`
/// 3. Backup thumbnail - keep `<id>_copy.jpg`
/// 4. Crop thumbnail - centered square crop in place
/// 5. Assign metadata - tags and cover art, then delete the thumbnail
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(DownloadAudioStep::new())
        .with_step(DownloadThumbnailStep::new())
        .with_step(BackupThumbnailStep::new())
        .with_step(CropThumbnailStep::new())
        .with_step(AssignMetadataStep::new())
}

/// Run the standard pipeline for the video in `ctx`.
///
/// Returns the final job state. Logs a success line naming the tagged file,
/// or a single error line when a step fails.
pub fn run_job(ctx: &Context) -> PipelineResult<JobState> {
    let mut state = JobState::new(&ctx.job_name);
    let result = match create_standard_pipeline().run(ctx, &mut state) {
        Ok(result) => result,
        Err(e) => {
            ctx.logger.error(&e.to_string());
            ctx.logger.close();
            return Err(e);
        }
    };

    tracing::debug!(
        "Job {} finished: {} completed, {} skipped",
        ctx.job_name,
        result.steps_completed.len(),
        result.steps_skipped.len()
    );
    if let Some(metadata) = &state.metadata {
        ctx.logger.success(&format!(
            "'{}' by {} saved to {}",
            metadata.title,
            metadata.artist,
            metadata.audio_path.display()
        ));
    }
    ctx.logger.close();

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::steps::test_support::{capture_context, context, FakeRunner, FakeTagger};
    use super::*;
    use crate::config::Settings;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn dir_listing(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn standard_pipeline_order() {
        assert_eq!(
            create_standard_pipeline().step_names(),
            vec![
                "Download audio",
                "Download thumbnail",
                "Backup thumbnail",
                "Crop thumbnail",
                "Assign metadata"
            ]
        );
    }

    #[test]
    fn end_to_end_leaves_audio_and_backup() {
        crate::logging::init_test_tracing();
        let dir = tempdir().unwrap();
        let runner = Arc::new(FakeRunner::simulated());
        let tagger = Arc::new(FakeTagger::default());
        let ctx = context(dir.path(), Settings::default(), runner.clone(), tagger.clone());

        let state = run_job(&ctx).unwrap();

        let expected: BTreeSet<String> = ["abc123.m4a", "abc123_copy.jpg"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dir_listing(dir.path()), expected);

        assert_eq!(
            image::image_dimensions(dir.path().join("abc123_copy.jpg")).unwrap(),
            (1280, 720)
        );
        assert_eq!(state.crop.unwrap().crop_box, (280, 0, 1000, 720));
        assert_eq!(tagger.writes().len(), 1);
        // yt-dlp audio, pythumb, yt-dlp info
        assert_eq!(runner.call_count(), 3);
    }

    #[test]
    fn skip_mode_reuses_existing_artifacts() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.download.skip_if_exists = true;

        // First run fetches everything.
        let runner = Arc::new(FakeRunner::simulated());
        let ctx = context(
            dir.path(),
            settings.clone(),
            runner.clone(),
            Arc::new(FakeTagger::default()),
        );
        run_job(&ctx).unwrap();

        // Audio is reused; the thumbnail was consumed and is fetched again.
        let rerun = Arc::new(FakeRunner::simulated());
        let ctx = context(dir.path(), settings, rerun.clone(), Arc::new(FakeTagger::default()));
        let mut state = JobState::new("abc123");
        let result = create_standard_pipeline().run(&ctx, &mut state).unwrap();

        assert_eq!(result.steps_skipped, vec!["Download audio"]);
        let programs: Vec<String> = rerun.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(programs, vec!["pythumb", "yt-dlp"]);
    }

    #[test]
    fn failed_tag_save_keeps_thumbnail() {
        let dir = tempdir().unwrap();
        let ctx = context(
            dir.path(),
            Settings::default(),
            Arc::new(FakeRunner::simulated()),
            Arc::new(FakeTagger::failing()),
        );

        let err = run_job(&ctx).unwrap_err();

        match &err {
            PipelineError::StepFailed { step_name, .. } => assert_eq!(step_name, "Assign metadata"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(err.step_error(), Some(StepError::TagWrite { .. })));
        assert!(dir.path().join("abc123.jpg").exists());
        assert!(dir.path().join("abc123_copy.jpg").exists());
    }

    #[test]
    fn download_failure_stops_before_thumbnail() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(FakeRunner::new(|_, _, _| {
            Ok(crate::tools::CommandOutput::failed(1, "ERROR: Video unavailable"))
        }));
        let ctx = context(
            dir.path(),
            Settings::default(),
            runner.clone(),
            Arc::new(FakeTagger::default()),
        );

        let err = run_job(&ctx).unwrap_err();

        assert!(matches!(
            err.step_error(),
            Some(StepError::CommandFailed { .. })
        ));
        assert_eq!(runner.call_count(), 1);
        assert!(dir_listing(dir.path()).is_empty());
    }

    #[test]
    fn step_failure_is_reported_once() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(FakeRunner::new(|_, _, _| {
            Ok(crate::tools::CommandOutput::failed(1, "ERROR: Video unavailable"))
        }));
        let (ctx, lines) = capture_context(dir.path(), Settings::default(), runner);

        let err = run_job(&ctx).unwrap_err();

        let errors: Vec<String> = lines
            .lock()
            .iter()
            .filter(|l| l.starts_with("[ERROR]"))
            .cloned()
            .collect();
        assert_eq!(errors, vec![format!("[ERROR] {}", err)]);
    }
}
