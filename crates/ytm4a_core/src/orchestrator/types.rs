//! Core types for the orchestrator pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::JobLogger;
use crate::media;
use crate::models::VideoRef;
use crate::tagging::{Mp4TagWriter, TagWriter};
use crate::tools::{SystemRunner, ToolRunner};

/// Read-only context passed to pipeline steps.
///
/// Contains the video, settings and collaborators that steps can read
/// but not modify. Mutable state goes in `JobState`.
pub struct Context {
    /// The video being processed.
    pub video: VideoRef,
    /// Application settings.
    pub settings: Settings,
    /// Job name (the video id) for error context.
    pub job_name: String,
    /// Directory where all artifacts live.
    pub work_dir: PathBuf,
    /// Opaque arguments forwarded to the audio downloader.
    pub extra_args: Vec<String>,
    /// Per-video logger.
    pub logger: Arc<JobLogger>,
    /// External tool executor.
    pub runner: Arc<dyn ToolRunner>,
    /// Audio metadata writer.
    pub tagger: Arc<dyn TagWriter>,
}

impl Context {
    /// Create a context using the real process runner and MP4 tag writer.
    pub fn new(
        video: VideoRef,
        settings: Settings,
        work_dir: impl Into<PathBuf>,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            job_name: video.id().to_string(),
            video,
            settings,
            work_dir: work_dir.into(),
            extra_args: Vec::new(),
            logger,
            runner: Arc::new(SystemRunner::new()),
            tagger: Arc::new(Mp4TagWriter::new()),
        }
    }

    /// Set the downloader passthrough arguments.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Replace the tool runner.
    pub fn with_runner(mut self, runner: Arc<dyn ToolRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the tag writer.
    pub fn with_tagger(mut self, tagger: Arc<dyn TagWriter>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn audio_extension(&self) -> &str {
        &self.settings.files.audio_extension
    }

    pub fn image_extension(&self) -> &str {
        &self.settings.files.image_extension
    }

    /// Locate the audio artifact for this video.
    pub fn find_audio(&self) -> std::io::Result<Option<PathBuf>> {
        media::find_audio_file(&self.work_dir, self.audio_extension(), self.video.id())
    }

    /// Expected thumbnail file name (`<id><ext>`).
    pub fn thumbnail_name(&self) -> String {
        media::image_name(self.video.id(), self.image_extension())
    }

    /// Expected thumbnail path, whether or not it exists.
    pub fn thumbnail_path(&self) -> PathBuf {
        self.work_dir.join(self.thumbnail_name())
    }

    /// Locate the thumbnail artifact for this video.
    pub fn find_thumbnail(&self) -> Option<PathBuf> {
        media::find_image_file(&self.work_dir, self.image_extension(), self.video.id())
    }

    /// Backup path for the thumbnail (`<id>_copy<ext>`).
    pub fn backup_path(&self) -> PathBuf {
        self.work_dir.join(media::backup_name(
            &self.thumbnail_name(),
            self.image_extension(),
        ))
    }
}

/// Display name of a path (file name only) for log lines.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Mutable job state that accumulates results from pipeline steps.
///
/// Each step's output is stored in its own section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Unique job identifier (the video id).
    pub job_id: String,
    /// When the job started.
    pub started_at: Option<String>,
    /// Audio acquisition result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<ArtifactOutput>,
    /// Thumbnail acquisition result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ArtifactOutput>,
    /// Path of the uncropped thumbnail copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    /// Crop result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropOutput>,
    /// Metadata assignment result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataOutput>,
}

impl JobState {
    /// Create a new job state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Check if the audio file is known.
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Check if tagging has been completed.
    pub fn is_tagged(&self) -> bool {
        self.metadata.is_some()
    }
}

/// A fetched (or kept) artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactOutput {
    pub path: PathBuf,
    /// False when an existing file was kept.
    pub downloaded: bool,
}

/// Output from the crop step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropOutput {
    pub path: PathBuf,
    /// (left, top, right, bottom)
    pub crop_box: (u32, u32, u32, u32),
}

/// Output from the metadata step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataOutput {
    pub audio_path: PathBuf,
    pub title: String,
    pub artist: String,
    pub year: String,
    /// Whether the thumbnail was deleted after the save.
    pub thumbnail_removed: bool,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (artifact kept, not an error).
    Skipped(String),
}
