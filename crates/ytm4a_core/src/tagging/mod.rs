//! MP4 metadata: the atom code table and the tag writer.

pub mod atoms;
mod writer;

pub use atoms::{atom_code, atom_name, AtomCode, M4A_ATOMS};
pub use writer::{apply_metadata, Mp4TagWriter, TagError, TagWriter, TrackMetadata};
