//! Writing track metadata and cover art into an MP4 `ilst`.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::error::LoftyError;
use lofty::file::AudioFile;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::picture::{Picture, PictureType};
use lofty::tag::{Accessor, TagExt};
use thiserror::Error;

use super::atoms;
use crate::tools::VideoInfo;

/// Errors from reading or saving tags.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("MP4 tag error: {0}")]
    Lofty(#[from] LoftyError),
}

/// Fields written to a single-track release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub year: String,
    pub genre: String,
    /// (number, total)
    pub disc: (u32, u32),
    /// (number, total)
    pub track: (u32, u32),
}

impl TrackMetadata {
    /// Metadata for a video released as a one-track single.
    pub fn single(info: &VideoInfo, genre: impl Into<String>) -> Self {
        Self {
            title: info.title.clone(),
            artist: info.author.clone(),
            album: format!("{} - Single", info.title),
            album_artist: info.author.clone(),
            year: info.year(),
            genre: genre.into(),
            disc: (1, 1),
            track: (1, 1),
        }
    }
}

/// Persists metadata into an audio file.
pub trait TagWriter: Send + Sync {
    /// Write all fields plus `cover` as the only artwork, then save.
    ///
    /// The file must be unchanged on disk when this returns an error.
    fn write(&self, audio: &Path, metadata: &TrackMetadata, cover: &[u8])
        -> Result<(), TagError>;
}

/// `TagWriter` for `.m4a`/`.mp4` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mp4TagWriter;

impl Mp4TagWriter {
    pub fn new() -> Self {
        Self
    }
}

impl TagWriter for Mp4TagWriter {
    fn write(
        &self,
        audio: &Path,
        metadata: &TrackMetadata,
        cover: &[u8],
    ) -> Result<(), TagError> {
        let existing = {
            let mut file = File::open(audio)?;
            let mp4 = Mp4File::read_from(&mut file, ParseOptions::new())?;
            mp4.ilst().cloned()
        };

        let mut ilst = existing.unwrap_or_default();
        apply_metadata(&mut ilst, metadata, cover)?;

        ilst.save_to_path(audio, WriteOptions::default())?;
        tracing::debug!("Saved {} atoms to {}", ilst.len(), audio.display());
        Ok(())
    }
}

/// Set every written field on `ilst`, replacing previous values.
pub fn apply_metadata(
    ilst: &mut Ilst,
    metadata: &TrackMetadata,
    cover: &[u8],
) -> Result<(), TagError> {
    let text_fields = [
        (atoms::TITLE, &metadata.title),
        (atoms::ARTIST, &metadata.artist),
        (atoms::ALBUM, &metadata.album),
        (atoms::ALBUM_ARTIST, &metadata.album_artist),
        (atoms::YEAR, &metadata.year),
        (atoms::GENRE, &metadata.genre),
    ];
    for (code, value) in text_fields {
        ilst.replace_atom(Atom::new(
            AtomIdent::Fourcc(code),
            AtomData::UTF8(value.clone()),
        ));
    }

    ilst.set_disk(metadata.disc.0);
    ilst.set_disk_total(metadata.disc.1);
    ilst.set_track(metadata.track.0);
    ilst.set_track_total(metadata.track.1);

    let mut picture = Picture::from_reader(&mut Cursor::new(cover))?;
    picture.set_pic_type(PictureType::CoverFront);
    ilst.replace_atom(Atom::new(
        AtomIdent::Fourcc(atoms::COVER_ARTWORK),
        AtomData::Picture(picture),
    ));

    Ok(())
}
