//! Video info (title, channel, publish date) from the downloader's JSON dump.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

/// Errors from interpreting the downloader's JSON output.
#[derive(Error, Debug)]
pub enum VideoInfoError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid date '{value}': {message}")]
    InvalidDate { value: String, message: String },
}

/// The subset of video info used for tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    /// Channel name (falls back to uploader).
    pub author: String,
    pub publish_date: NaiveDate,
}

impl VideoInfo {
    /// 4-digit publish year.
    pub fn year(&self) -> String {
        format!("{:04}", self.publish_date.year())
    }
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    title: Option<String>,
    channel: Option<String>,
    uploader: Option<String>,
    upload_date: Option<String>,
    release_date: Option<String>,
    timestamp: Option<i64>,
}

/// Arguments that make the downloader print video info as JSON without downloading.
pub fn info_args(url: &str) -> Vec<String> {
    [
        "--dump-json",
        "--no-download",
        "--no-playlist",
        "--no-warnings",
        url,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Parse the JSON printed by `--dump-json`.
pub fn parse_video_info(json: &str) -> Result<VideoInfo, VideoInfoError> {
    // The dump is one JSON object per line; only the first is relevant.
    let first = json
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or(json);
    let raw: RawInfo = serde_json::from_str(first)?;

    let title = non_empty(raw.title).ok_or(VideoInfoError::MissingField("title"))?;
    let author = non_empty(raw.channel)
        .or_else(|| non_empty(raw.uploader))
        .ok_or(VideoInfoError::MissingField("channel"))?;

    let publish_date = match (non_empty(raw.upload_date), non_empty(raw.release_date)) {
        (Some(date), _) | (None, Some(date)) => parse_compact_date(&date)?,
        (None, None) => {
            let ts = raw
                .timestamp
                .ok_or(VideoInfoError::MissingField("upload_date"))?;
            DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| VideoInfoError::InvalidDate {
                    value: ts.to_string(),
                    message: "timestamp out of range".to_string(),
                })?
                .date_naive()
        }
    };

    Ok(VideoInfo {
        title,
        author,
        publish_date,
    })
}

/// Parse `YYYYMMDD`.
fn parse_compact_date(value: &str) -> Result<NaiveDate, VideoInfoError> {
    NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|e| VideoInfoError::InvalidDate {
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
