//! MP4 `ilst` atom codes.
//!
//! Field name to four-byte atom identifier. `©` is the single byte 0xA9.
//! Only the codes re-exported as constants below are written; the rest of
//! the table is kept so more fields can be wired up later.

/// A named metadata atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomCode {
    pub name: &'static str,
    pub code: [u8; 4],
}

impl AtomCode {
    const fn new(name: &'static str, code: &[u8; 4]) -> Self {
        Self { name, code: *code }
    }

    /// Printable form of the code (`©nam`).
    pub fn display_code(&self) -> String {
        self.code
            .iter()
            .map(|&b| if b == 0xA9 { '©' } else { b as char })
            .collect()
    }
}

pub const TITLE: [u8; 4] = *b"\xa9nam";
pub const ALBUM: [u8; 4] = *b"\xa9alb";
pub const ARTIST: [u8; 4] = *b"\xa9ART";
pub const ALBUM_ARTIST: [u8; 4] = *b"aART";
pub const YEAR: [u8; 4] = *b"\xa9day";
pub const GENRE: [u8; 4] = *b"\xa9gen";
pub const TRACK_NUMBER: [u8; 4] = *b"trkn";
pub const DISC_NUMBER: [u8; 4] = *b"disk";
pub const COVER_ARTWORK: [u8; 4] = *b"covr";

/// Every recognized atom, in the order iTunes documents them.
pub const M4A_ATOMS: &[AtomCode] = &[
    AtomCode::new("track title", &TITLE),
    AtomCode::new("album", &ALBUM),
    AtomCode::new("artist", &ARTIST),
    AtomCode::new("album artist", &ALBUM_ARTIST),
    AtomCode::new("composer", b"\xa9wrt"),
    AtomCode::new("year", &YEAR),
    AtomCode::new("comment", b"\xa9cmt"),
    AtomCode::new("description", b"desc"),
    AtomCode::new("purchase date", b"purd"),
    AtomCode::new("grouping", b"\xa9grp"),
    AtomCode::new("genre", &GENRE),
    AtomCode::new("lyrics", b"\xa9lyr"),
    AtomCode::new("podcast URL", b"purl"),
    AtomCode::new("podcast episode GUID", b"egid"),
    AtomCode::new("podcast category", b"catg"),
    AtomCode::new("podcast keywords", b"keyw"),
    AtomCode::new("encoded by", b"\xa9too"),
    AtomCode::new("copyright", b"cprt"),
    AtomCode::new("album sort order", b"soal"),
    AtomCode::new("album artist sort order", b"soaa"),
    AtomCode::new("artist sort order", b"soar"),
    AtomCode::new("title sort order", b"sonm"),
    AtomCode::new("composer sort order", b"soco"),
    AtomCode::new("show sort order", b"sosn"),
    AtomCode::new("show name", b"tvsh"),
    AtomCode::new("work", b"\xa9wrk"),
    AtomCode::new("movement", b"\xa9mvn"),
    AtomCode::new("part of a compilation", b"cpil"),
    AtomCode::new("part of a gapless album", b"pgap"),
    AtomCode::new("podcast", b"pcst"),
    AtomCode::new("track number, total tracks", &TRACK_NUMBER),
    AtomCode::new("disc number, total discs", &DISC_NUMBER),
    AtomCode::new("tempo/BPM", b"tmpo"),
    AtomCode::new("movement count", b"\xa9mvc"),
    AtomCode::new("movement index", b"\xa9mvi"),
    AtomCode::new("work/movement", b"shwm"),
    AtomCode::new("media kind", b"stik"),
    AtomCode::new("HD video", b"hdvd"),
    AtomCode::new("content rating", b"rtng"),
    AtomCode::new("TV episode", b"tves"),
    AtomCode::new("TV season", b"tvsn"),
    AtomCode::new("plID", b"plID"),
    AtomCode::new("cnID", b"cnID"),
    AtomCode::new("geID", b"geID"),
    AtomCode::new("atID", b"atID"),
    AtomCode::new("sfID", b"sfID"),
    AtomCode::new("cmID", b"cmID"),
    AtomCode::new("akID", b"akID"),
    AtomCode::new("cover artwork", &COVER_ARTWORK),
];

/// Look up an atom code by field name (case-insensitive).
pub fn atom_code(name: &str) -> Option<[u8; 4]> {
    M4A_ATOMS
        .iter()
        .find(|atom| atom.name.eq_ignore_ascii_case(name))
        .map(|atom| atom.code)
}

/// Look up a field name by atom code.
pub fn atom_name(code: &[u8; 4]) -> Option<&'static str> {
    M4A_ATOMS
        .iter()
        .find(|atom| &atom.code == code)
        .map(|atom| atom.name)
}
