//! Resolving naming fields for discrete track files.
//!
//! Two strategies are tried in a fixed order. Embedded tags are preferred;
//! when they cannot be read, or say nothing useful, the directory layout of a
//! typical `Artist/Year - Album/NN - Title.ext` rip is used instead. Both
//! strategies produce the same [`TrackFileRecord`] shape.

use super::TrackFileRecord;
use crate::constants::{UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TITLE, UNKNOWN_TRACK_NUMBER};
use lofty::file::TaggedFileExt;
use lofty::tag::{Accessor, ItemKey, Tag};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Tags,
    PathHeuristic,
}

impl Strategy {
    pub fn resolve(self, path: &Path) -> Option<TrackFileRecord> {
        match self {
            Strategy::Tags => from_tags(path),
            Strategy::PathHeuristic => Some(from_path(path)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Tags => write!(f, "tags"),
            Strategy::PathHeuristic => write!(f, "path"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetadataResolver {
    strategies: Vec<Strategy>,
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new(vec![Strategy::Tags, Strategy::PathHeuristic])
    }
}

impl MetadataResolver {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// First strategy to succeed wins. The path heuristic never fails, so it
    /// also backs a resolver configured without it.
    pub fn resolve(&self, path: &Path) -> TrackFileRecord {
        self.strategies
            .iter()
            .find_map(|strategy| {
                let record = strategy.resolve(path)?;
                log::debug!("Resolved {} via {strategy}", path.display());
                Some(record)
            })
            .unwrap_or_else(|| from_path(path))
    }
}

fn non_empty(value: Option<impl AsRef<str>>) -> Option<String> {
    value
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Read embedded tags. `None` means the next strategy should be tried.
fn from_tags(path: &Path) -> Option<TrackFileRecord> {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Unreadable tags in {}: {e}", path.display());
            return None;
        }
    };

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())?;

    let artist =
        non_empty(tag.artist()).or_else(|| non_empty(tag.get_string(&ItemKey::AlbumArtist)));
    let title = non_empty(tag.title());
    if artist.is_none() && title.is_none() {
        log::debug!("No artist or title tag in {}", path.display());
        return None;
    }

    let album = non_empty(tag.album()).unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
    let title = title
        .or_else(|| non_empty(Some(file_stem(path))))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    Some(TrackFileRecord::new(
        path,
        &artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        &album,
        &raw_track_number(tag),
        &title,
    ))
}

fn raw_track_number(tag: &Tag) -> String {
    tag.get_string(&ItemKey::TrackNumber)
        .map(str::to_string)
        .or_else(|| tag.track().map(|n| n.to_string()))
        .unwrap_or_else(|| UNKNOWN_TRACK_NUMBER.to_string())
}

/// Derive naming fields from an `Artist/Year - Album/NN - Title.ext` layout.
pub fn from_path(path: &Path) -> TrackFileRecord {
    let album_dir = path.parent();
    let artist_dir = album_dir.and_then(Path::parent);

    let dir_name = |dir: Option<&Path>| {
        non_empty(dir.and_then(Path::file_name).map(|n| n.to_string_lossy()))
    };

    let artist = dir_name(artist_dir).unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let album = dir_name(album_dir)
        .map(|name| strip_year_prefix(&name).to_string())
        .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    let stem = file_stem(path);
    let (number, title) = split_stem(&stem);
    let title = non_empty(Some(title)).unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    TrackFileRecord::new(path, &artist, &album, number, &title)
}

/// `"1999 - Album"` → `"Album"`. The prefix token may not contain spaces.
fn strip_year_prefix(album: &str) -> &str {
    match album.split_once(" - ") {
        Some((token, rest))
            if !token.is_empty()
                && !token.contains(char::is_whitespace)
                && !rest.trim().is_empty() =>
        {
            rest.trim()
        }
        _ => album,
    }
}

/// Split `"NN - Title"` into number and title; other stems are all title.
fn split_stem(stem: &str) -> (&str, &str) {
    let starts_with_two_digits =
        stem.len() >= 2 && stem.as_bytes()[..2].iter().all(u8::is_ascii_digit);
    if !starts_with_two_digits {
        return (UNKNOWN_TRACK_NUMBER, stem);
    }

    if let Some((number, title)) = stem.split_once(" - ") {
        return (number.trim(), title.trim());
    }

    let digits = stem.len() - stem.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let rest = stem[digits..]
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '-' | '_'))
        .trim();
    if rest.is_empty() {
        (UNKNOWN_TRACK_NUMBER, stem)
    } else {
        (&stem[..digits], rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_split_stem() {
        assert_eq!(split_stem("03 - Song"), ("03", "Song"));
        assert_eq!(split_stem("03 - Song - Live"), ("03", "Song - Live"));
        assert_eq!(split_stem("07. Song"), ("07", "Song"));
        assert_eq!(split_stem("Song"), ("00", "Song"));
        assert_eq!(split_stem("1 - Song"), ("00", "1 - Song"));
        assert_eq!(split_stem("1999"), ("00", "1999"));
    }

    #[test]
    fn test_strip_year_prefix() {
        assert_eq!(strip_year_prefix("1999 - Album"), "Album");
        assert_eq!(strip_year_prefix("[2001] - Album"), "Album");
        assert_eq!(strip_year_prefix("Album"), "Album");
        assert_eq!(strip_year_prefix("Live at the - Hall"), "Live at the - Hall");
    }

    #[test]
    fn test_from_path() {
        let record = from_path(Path::new("/music/The Band/1999 - Album/04 - Fourth.mp3"));
        assert_eq!(record.artist, "The Band");
        assert_eq!(record.album, "Album");
        assert_eq!(record.track_number, "04");
        assert_eq!(record.title, "Fourth");
        assert_eq!(record.file_name(), "The Band - Album - 04 - Fourth.mp3");
    }

    #[test]
    fn test_from_path_without_number() {
        let record = from_path(Path::new("/Artist/Album/Some Song.flac"));
        assert_eq!(record.track_number, "00");
        assert_eq!(record.title, "Some Song");
    }

    #[test]
    fn test_from_path_at_filesystem_root() {
        let record = from_path(Path::new("/song.mp3"));
        assert_eq!(record.artist, UNKNOWN_ARTIST);
        assert_eq!(record.album, UNKNOWN_ALBUM);
        assert_eq!(record.title, "song");
    }

    #[test]
    fn test_corrupt_file_falls_through_to_path() {
        let temp_dir = TempDir::new().unwrap();
        let album_dir = temp_dir.path().join("Artist").join("2001 - Record");
        fs::create_dir_all(&album_dir).unwrap();
        let file = album_dir.join("02 - Broken.mp3");
        fs::write(&file, b"this is not an mp3 file at all").unwrap();

        assert!(Strategy::Tags.resolve(&file).is_none());

        let record = MetadataResolver::default().resolve(&file);
        assert_eq!(record.artist, "Artist");
        assert_eq!(record.album, "Record");
        assert_eq!(record.track_number, "02");
        assert_eq!(record.title, "Broken");
    }

    #[test]
    fn test_resolver_without_path_strategy_still_resolves() {
        let resolver = MetadataResolver::new(vec![Strategy::Tags]);
        let record = resolver.resolve(Path::new("/nonexistent/A/B/01 - C.mp3"));
        assert_eq!(record.file_name(), "A - B - 01 - C.mp3");
    }
}
