//! Data models shared across the pipeline.

mod video;

pub use video::{extract_video_id, UrlShape, VideoIdError, VideoRef};
