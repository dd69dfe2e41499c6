//! Artifact lookup in the working directory.
//!
//! Audio files are matched by "name contains the video id" because the
//! downloader's default output template embeds the id in a longer name
//! (`Title [id].m4a`). Thumbnails are always exactly `<id><ext>`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List file names in `dir` ending with `extension`, sorted.
fn list_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(extension) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// List audio files in `dir`.
pub fn list_audio_files(dir: &Path, audio_extension: &str) -> io::Result<Vec<String>> {
    list_with_extension(dir, audio_extension)
}

/// List image files in `dir`.
pub fn list_image_files(dir: &Path, image_extension: &str) -> io::Result<Vec<String>> {
    list_with_extension(dir, image_extension)
}

/// Find the first audio file whose name contains `video_id`.
pub fn find_audio_file(
    dir: &Path,
    audio_extension: &str,
    video_id: &str,
) -> io::Result<Option<PathBuf>> {
    Ok(list_audio_files(dir, audio_extension)?
        .into_iter()
        .find(|name| name.contains(video_id))
        .map(|name| dir.join(name)))
}

/// Expected thumbnail file name for a video.
pub fn image_name(video_id: &str, image_extension: &str) -> String {
    format!("{}{}", video_id, image_extension)
}

/// Return `<dir>/<id><ext>` if that thumbnail exists.
pub fn find_image_file(dir: &Path, image_extension: &str, video_id: &str) -> Option<PathBuf> {
    let path = dir.join(image_name(video_id, image_extension));
    path.is_file().then_some(path)
}

/// Backup name for an image: `<stem>_copy<ext>`.
pub fn backup_name(image_name: &str, image_extension: &str) -> String {
    match image_name.strip_suffix(image_extension) {
        Some(stem) => format!("{}_copy{}", stem, image_extension),
        None => format!("{}_copy", image_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn lists_only_matching_extension() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.m4a");
        touch(dir.path(), "a.m4a");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "notes.txt");
        fs::create_dir(dir.path().join("folder.m4a")).unwrap();

        assert_eq!(
            list_audio_files(dir.path(), ".m4a").unwrap(),
            vec!["a.m4a", "b.m4a"]
        );
        assert_eq!(list_image_files(dir.path(), ".jpg").unwrap(), vec!["a.jpg"]);
    }

    #[test]
    fn finds_audio_by_contained_id() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "Some Song [abc123].m4a");
        touch(dir.path(), "Other [zzz999].m4a");

        let found = find_audio_file(dir.path(), ".m4a", "abc123").unwrap();
        assert_eq!(found, Some(dir.path().join("Some Song [abc123].m4a")));
        assert_eq!(find_audio_file(dir.path(), ".m4a", "nope").unwrap(), None);
    }

    #[test]
    fn finds_exact_image_only() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "abc123_copy.jpg");
        assert_eq!(find_image_file(dir.path(), ".jpg", "abc123"), None);

        touch(dir.path(), "abc123.jpg");
        assert_eq!(
            find_image_file(dir.path(), ".jpg", "abc123"),
            Some(dir.path().join("abc123.jpg"))
        );
    }

    #[test]
    fn backup_name_inserts_suffix() {
        assert_eq!(backup_name("abc123.jpg", ".jpg"), "abc123_copy.jpg");
        assert_eq!(backup_name("abc123.png", ".jpg"), "abc123.png_copy");
    }
}
