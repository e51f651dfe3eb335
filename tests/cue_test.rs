use musictl::cue::{self, CuePair, TimeCode, find_pairs_recursive};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SHEET: &str = r#"REM GENRE Rock
PERFORMER "Artist"
TITLE "LP"
FILE "album.flac" WAVE
  TRACK 01 AUDIO
    TITLE "One"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    TITLE "Two"
    PERFORMER "Guest"
    INDEX 00 03:08:00
    INDEX 01 03:10:50
  TRACK 03 AUDIO
    TITLE "Three"
    INDEX 01 07:02:30
"#;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

#[test]
fn test_parse_file_with_bom_and_crlf() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("album.cue");
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend(SHEET.replace('\n', "\r\n").into_bytes());
    fs::write(&path, bytes).unwrap();

    let sheet = cue::parse_file(&path).unwrap();
    assert_eq!(sheet.album_artist, "Artist");
    assert_eq!(sheet.album_title, "LP");
    assert_eq!(sheet.file.as_deref(), Some("album.flac"));
    assert_eq!(sheet.tracks.len(), 3);

    let second = &sheet.tracks[1];
    assert_eq!(second.performer, "Guest");
    assert_eq!(second.start_time, TimeCode::parse("03:10:50").unwrap());
    assert_eq!(
        second.end_time.map(|t| t.to_external_format()),
        Some("00:07:02.400".to_string())
    );
    assert_eq!(sheet.tracks[2].end_time, None);
}

#[test]
fn test_parse_file_windows_1251() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("kino.cue");
    let text = "PERFORMER \"Кино\"\nTITLE \"Группа крови\"\nTRACK 01 AUDIO\nTITLE \"Звезда\"\nINDEX 01 00:00:00\n";
    let (bytes, _, unmappable) = encoding_rs::WINDOWS_1251.encode(text);
    assert!(!unmappable);
    fs::write(&path, &bytes).unwrap();

    let sheet = cue::parse_file(&path).unwrap();
    assert_eq!(sheet.album_artist, "Кино");
    assert_eq!(sheet.album_title, "Группа крови");
    assert_eq!(sheet.tracks[0].title, "Звезда");
    assert_eq!(sheet.tracks[0].performer, "Кино");
}

#[test]
fn test_parse_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = cue::parse_file(&temp_dir.path().join("missing.cue"));
    assert!(matches!(result, Err(cue::CueError::Io(_))));
}

#[test]
fn test_find_pairs_recursive_skips_ignored_and_unpaired() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    touch(&root.join("A/album.cue"));
    touch(&root.join("A/album.flac"));
    touch(&root.join("B/C/disc.cue"));
    touch(&root.join("B/C/image.wav"));
    touch(&root.join("lonely/sheet.cue"));
    touch(&root.join("downloads/partial.cue"));
    touch(&root.join("downloads/partial.flac"));

    let pairs = find_pairs_recursive(root, &["downloads".to_string()]).unwrap();
    assert_eq!(
        pairs,
        vec![
            CuePair {
                cue_path: root.join("A/album.cue"),
                audio_path: root.join("A/album.flac"),
            },
            CuePair {
                cue_path: root.join("B/C/disc.cue"),
                audio_path: root.join("B/C/image.wav"),
            },
        ]
    );
}
