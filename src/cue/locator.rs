//! Pairing CUE sheets with the album image they describe.
//!
//! Rips in the wild are messy: the image is usually named after the sheet, but
//! not always. A sheet without any image beside it is dropped silently.

use crate::constants::{CUE_AUDIO_EXTENSIONS, CUE_EXTENSION};
use crate::utils::scan::{collect_directories, list_directory};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuePair {
    pub cue_path: PathBuf,
    pub audio_path: PathBuf,
}

fn extension_is(path: &Path, wanted: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
}

/// Find CUE sheets directly inside `directory` and pair each with its image.
pub fn find_pairs(directory: &Path) -> Result<Vec<CuePair>, Box<dyn Error>> {
    let entries = list_directory(directory)?;
    let files: Vec<&PathBuf> = entries.iter().filter(|p| p.is_file()).collect();

    let pairs = files
        .iter()
        .filter(|p| extension_is(p, CUE_EXTENSION))
        .filter_map(|cue_path| {
            let audio_path = companion_by_stem(cue_path).or_else(|| first_image(&files));
            if audio_path.is_none() {
                log::debug!("No album image next to {}", cue_path.display());
            }
            audio_path.map(|audio_path| CuePair {
                cue_path: cue_path.to_path_buf(),
                audio_path,
            })
        })
        .collect();

    Ok(pairs)
}

/// Apply [`find_pairs`] to `root` and every subdirectory below it.
pub fn find_pairs_recursive(
    root: &Path,
    ignored: &[String],
) -> Result<Vec<CuePair>, Box<dyn Error>> {
    let mut pairs = find_pairs(root)?;
    for dir in collect_directories(root, ignored)? {
        match find_pairs(&dir) {
            Ok(found) => pairs.extend(found),
            Err(e) => log::warn!("Failed to look for CUE sheets in {}: {e}", dir.display()),
        }
    }
    Ok(pairs)
}

fn companion_by_stem(cue_path: &Path) -> Option<PathBuf> {
    let stem = cue_path.file_stem()?.to_string_lossy();
    let dir = cue_path.parent()?;
    CUE_AUDIO_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

fn first_image(files: &[&PathBuf]) -> Option<PathBuf> {
    CUE_AUDIO_EXTENSIONS.iter().find_map(|ext| {
        files
            .iter()
            .find(|p| extension_is(p, ext))
            .map(|p| p.to_path_buf())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_exact_stem_match_preferred() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let cue = touch(dir, "album.cue");
        touch(dir, "aaa.flac");
        let wav = touch(dir, "album.wav");

        let pairs = find_pairs(dir).unwrap();
        assert_eq!(pairs, vec![CuePair { cue_path: cue, audio_path: wav }]);
    }

    #[test]
    fn test_stem_match_follows_extension_preference() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(dir, "album.cue");
        touch(dir, "album.ape");
        let flac = touch(dir, "album.flac");

        let pairs = find_pairs(dir).unwrap();
        assert_eq!(pairs[0].audio_path, flac);
    }

    #[test]
    fn test_falls_back_to_any_image() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(dir, "Artist - Album.cue");
        touch(dir, "image.ape");
        let wav = touch(dir, "image.wav");

        let pairs = find_pairs(dir).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].audio_path, wav);
    }

    #[test]
    fn test_sheet_without_image_is_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(dir, "album.cue");
        touch(dir, "album.mp3");

        assert!(find_pairs(dir).unwrap().is_empty());
    }

    #[test]
    fn test_not_recursive_at_directory_level() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("cd1");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "album.cue");
        touch(&sub, "album.flac");

        assert!(find_pairs(temp_dir.path()).unwrap().is_empty());
        let pairs = find_pairs_recursive(temp_dir.path(), &[]).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].cue_path, sub.join("album.cue"));
    }
}
