//! Canonical naming of imported tracks.
//!
//! Every file that reaches the library is named
//! `Artist - Album - NN - Title.ext`, whether its fields came from a CUE
//! sheet, embedded tags, or the directory layout it was found in.

use crate::constants::{
    HOSTILE_FILENAME_CHARS, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TITLE, UNKNOWN_TRACK_NUMBER,
};
use crate::cue::CueTrack;
use std::path::{Path, PathBuf};

pub mod metadata;

pub use metadata::{MetadataResolver, Strategy};

/// Resolved naming fields for one file headed for the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFileRecord {
    pub source_path: PathBuf,
    pub artist: String,
    pub album: String,
    /// Always exactly two digits.
    pub track_number: String,
    pub title: String,
    /// Lowercase, without the leading dot.
    pub extension: String,
}

impl TrackFileRecord {
    pub fn new(
        source_path: &Path,
        artist: &str,
        album: &str,
        track_number: &str,
        title: &str,
    ) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            artist: artist.to_string(),
            album: album.to_string(),
            track_number: format_track_number(track_number),
            title: title.to_string(),
            extension: extension_of(source_path),
        }
    }

    /// Naming fields of a track cut from a CUE album image. Blank sheet
    /// fields fall back to the same placeholders as untagged files.
    pub fn from_cue_track(source_path: &Path, track: &CueTrack) -> Self {
        Self::new(
            source_path,
            or_placeholder(&track.performer, UNKNOWN_ARTIST),
            or_placeholder(&track.album, UNKNOWN_ALBUM),
            &track.number.to_string(),
            or_placeholder(&track.title, UNKNOWN_TITLE),
        )
    }

    pub fn file_name(&self) -> String {
        let stem = format!(
            "{} - {} - {} - {}",
            self.artist, self.album, self.track_number, self.title
        );
        let stem = sanitize_file_name(&stem);
        if self.extension.is_empty() {
            stem
        } else {
            format!("{stem}.{}", self.extension)
        }
    }

    pub fn target_path(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(self.file_name())
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Render a track number as exactly two digits.
///
/// A `/total` suffix is dropped first. Anything that is not a number between
/// 0 and 99 becomes `"00"`.
pub fn format_track_number(raw: &str) -> String {
    let number = raw.split('/').next().unwrap_or_default().trim();
    match number.parse::<u32>() {
        Ok(n) if n < 100 => format!("{n:02}"),
        _ => UNKNOWN_TRACK_NUMBER.to_string(),
    }
}

/// Replace characters that are not allowed in file names on common filesystems.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if HOSTILE_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_track_number() {
        assert_eq!(format_track_number("3"), "03");
        assert_eq!(format_track_number("03/12"), "03");
        assert_eq!(format_track_number("abc"), "00");
        assert_eq!(format_track_number(""), "00");
        assert_eq!(format_track_number(" 7 "), "07");
        assert_eq!(format_track_number("12"), "12");
        assert_eq!(format_track_number("123"), "00");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("AC/DC: Live?"), "AC_DC_ Live_");
        assert_eq!(sanitize_file_name(r#"a<b>c"d\e|f*g"#), "a_b_c_d_e_f_g");
        assert_eq!(sanitize_file_name("  padded  "), "padded");
    }

    #[test]
    fn test_record_file_name() {
        let record = TrackFileRecord::new(
            Path::new("/tmp/in/01 - Song.MP3"),
            "Artist",
            "Album",
            "1/10",
            "Song: Remix",
        );
        assert_eq!(record.file_name(), "Artist - Album - 01 - Song_ Remix.mp3");
        assert_eq!(
            record.target_path(Path::new("/lib")),
            PathBuf::from("/lib/Artist - Album - 01 - Song_ Remix.mp3")
        );
    }

    #[test]
    fn test_record_from_cue_track() {
        let sheet = crate::cue::parse_text(
            "PERFORMER \"Band\"\nTITLE \"LP\"\nTRACK 4 AUDIO\nTITLE \"Four\"\n",
        );
        let record =
            TrackFileRecord::from_cue_track(Path::new("/tmp/04 - Four.flac"), &sheet.tracks[0]);
        assert_eq!(record.file_name(), "Band - LP - 04 - Four.flac");
    }

    #[test]
    fn test_record_from_cue_track_with_blank_fields() {
        let sheet = crate::cue::parse_text(
            "PERFORMER \"\"\nTITLE \"  \"\nTRACK 2 AUDIO\nTITLE \"\"\nINDEX 01 00:00:00\n",
        );
        let record =
            TrackFileRecord::from_cue_track(Path::new("/tmp/02.flac"), &sheet.tracks[0]);
        assert_eq!(
            record.file_name(),
            "Unknown Artist - Unknown Album - 02 - Unknown Title.flac"
        );
    }
}
