//! Video references and identifier extraction.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors from turning a URL into a video identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoIdError {
    /// Not a URL of either supported shape.
    #[error("Unsupported video URL '{url}': {reason}")]
    UnsupportedUrl { url: String, reason: String },

    /// Supported host, but the identifier component is absent or empty.
    #[error("No video identifier found in '{0}'")]
    MissingId(String),
}

impl VideoIdError {
    fn unsupported(url: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// The two recognized URL shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlShape {
    /// `https://www.youtube.com/watch?v=<id>&...`
    Watch,
    /// `https://youtu.be/<id>?si=...`
    Short,
}

/// A video URL together with its extracted identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    url: String,
    id: String,
    shape: UrlShape,
}

impl VideoRef {
    /// Parse a URL, extracting its identifier.
    pub fn parse(url: &str) -> Result<Self, VideoIdError> {
        let url = url.trim();
        let (id, shape) = extract_video_id(url)?;
        Ok(Self {
            url: url.to_string(),
            id,
            shape,
        })
    }

    /// The URL as given (trimmed).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The short video identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape(&self) -> UrlShape {
        self.shape
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}

/// Extract the video identifier from a watch or short URL.
pub fn extract_video_id(raw: &str) -> Result<(String, UrlShape), VideoIdError> {
    let parsed = parse_lenient(raw)?;

    let host = parsed
        .host_str()
        .ok_or_else(|| VideoIdError::unsupported(raw, "URL has no host"))?
        .to_ascii_lowercase();

    if host == "youtu.be" {
        let id = parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| VideoIdError::MissingId(raw.to_string()))?;
        return Ok((id.to_string(), UrlShape::Short));
    }

    if host == "youtube.com" || host.ends_with(".youtube.com") {
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| VideoIdError::MissingId(raw.to_string()))?;
        return Ok((id, UrlShape::Watch));
    }

    Err(VideoIdError::unsupported(
        raw,
        format!("host '{}' is not youtube.com or youtu.be", host),
    ))
}

/// Parse a URL, retrying with an `https://` prefix when the scheme is missing.
fn parse_lenient(raw: &str) -> Result<Url, VideoIdError> {
    match Url::parse(raw) {
        Ok(url) if url.has_host() => Ok(url),
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", raw))
                .map_err(|e| VideoIdError::unsupported(raw, e.to_string()))
        }
        Err(e) => Err(VideoIdError::unsupported(raw, e.to_string())),
    }
}
