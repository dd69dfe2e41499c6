//! ytm4a Core - Backend logic for youtube-to-m4a
//!
//! This crate contains the download, crop and tagging pipeline with zero
//! CLI dependencies. The binary in `ytm4a_cli` only parses arguments,
//! loads settings and runs the standard pipeline.

pub mod config;
pub mod logging;
pub mod media;
pub mod models;
pub mod orchestrator;
pub mod tagging;
pub mod tools;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
