//! Fakes shared by step and pipeline tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};
use parking_lot::Mutex;

use crate::config::Settings;
use crate::logging::{JobLogger, LogConfig};
use crate::models::VideoRef;
use crate::orchestrator::types::Context;
use crate::tagging::{TagError, TagWriter, TrackMetadata};
use crate::tools::{CommandOutput, ToolRunner};

pub(crate) const VIDEO_ID: &str = "abc123";
pub(crate) const VIDEO_URL: &str = "https://www.youtube.com/watch?v=abc123&t=5";
pub(crate) const VIDEO_JSON: &str = r#"{"id":"abc123","title":"Plastic Love","channel":"Mariya Takeuchi","upload_date":"20191120"}"#;

type Handler = Box<dyn Fn(&str, &[String], &Path) -> io::Result<CommandOutput> + Send + Sync>;

/// Runner that records every call and answers through a closure.
pub(crate) struct FakeRunner {
    handler: Handler,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub(crate) fn new(
        handler: impl Fn(&str, &[String], &Path) -> io::Result<CommandOutput> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Runner that behaves like the real downloader and thumbnail fetcher.
    ///
    /// `yt-dlp -x` writes `<id>.m4a`, `yt-dlp --dump-json` prints info and
    /// `pythumb` writes a 1280x720 `<id>.jpg`.
    pub(crate) fn simulated() -> Self {
        Self::new(|program, args, cwd| {
            if args.iter().any(|a| a == "--dump-json") {
                return Ok(CommandOutput::ok(format!("{}\n", VIDEO_JSON)));
            }
            match program {
                "yt-dlp" => {
                    std::fs::write(cwd.join(format!("{}.m4a", VIDEO_ID)), b"audio")?;
                    Ok(CommandOutput::ok("[download] 100% of 4.20MiB\n"))
                }
                "pythumb" => {
                    write_jpeg(&cwd.join(format!("{}.jpg", VIDEO_ID)), 1280, 720);
                    Ok(CommandOutput::ok(""))
                }
                other => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} not installed", other),
                )),
            }
        })
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<CommandOutput> {
        self.calls
            .lock()
            .push((program.to_string(), args.to_vec()));
        (self.handler)(program, args, cwd)
    }
}

/// Tag writer that records calls instead of touching the audio file.
#[derive(Default)]
pub(crate) struct FakeTagger {
    pub(crate) fail: bool,
    writes: Mutex<Vec<(PathBuf, TrackMetadata, usize)>>,
}

impl FakeTagger {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// (audio path, metadata, cover byte count) per call.
    pub(crate) fn writes(&self) -> Vec<(PathBuf, TrackMetadata, usize)> {
        self.writes.lock().clone()
    }
}

impl TagWriter for FakeTagger {
    fn write(
        &self,
        audio: &Path,
        metadata: &TrackMetadata,
        cover: &[u8],
    ) -> Result<(), TagError> {
        if self.fail {
            return Err(TagError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only file",
            )));
        }
        self.writes
            .lock()
            .push((audio.to_path_buf(), metadata.clone(), cover.len()));
        Ok(())
    }
}

/// Write a solid-colour JPEG of the given size.
pub(crate) fn write_jpeg(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([200, 40, 90]))
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Context with fakes for both collaborators and a silent logger.
pub(crate) fn context(
    dir: &Path,
    settings: Settings,
    runner: Arc<FakeRunner>,
    tagger: Arc<FakeTagger>,
) -> Context {
    Context::new(
        VideoRef::parse(VIDEO_URL).unwrap(),
        settings,
        dir,
        Arc::new(JobLogger::silent()),
    )
    .with_runner(runner)
    .with_tagger(tagger)
}

/// Context whose logger collects every console line.
pub(crate) fn capture_context(
    dir: &Path,
    settings: Settings,
    runner: Arc<FakeRunner>,
) -> (Context, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let logger = JobLogger::new(
        VIDEO_ID,
        None,
        LogConfig::default(),
        Some(Box::new(move |line: &str| sink.lock().push(line.to_string()))),
    )
    .unwrap();

    let ctx = Context::new(VideoRef::parse(VIDEO_URL).unwrap(), settings, dir, Arc::new(logger))
        .with_runner(runner)
        .with_tagger(Arc::new(FakeTagger::default()));
    (ctx, lines)
}
