//! Directory scanning utilities.
//!
//! Traversal is sequential and sorted so that discovery order is stable from
//! run to run; the import pipeline processes files in the order found here.
//!
//! Errors encountered while scanning subdirectories (e.g., permission denied)
//! are logged but do not stop the scan.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Check if a file or directory is hidden (starts with '.')
pub fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Check whether `path`, relative to the scan root, contains an ignored fragment.
pub fn is_ignored(root: &Path, path: &Path, ignored: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    ignored
        .iter()
        .filter(|fragment| !fragment.is_empty())
        .any(|fragment| relative.contains(fragment.as_str()))
}

/// Case-insensitive extension match; configured extensions may carry a leading dot.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy();
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// Sorted, non-hidden entries of a single directory.
pub fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| !is_hidden_file(p));
    paths.sort();
    Ok(paths)
}

/// Collect all files matching the given extensions in a directory tree.
pub fn collect_audio_files(
    root: &Path,
    extensions: &[String],
    ignored: &[String],
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();
    walk(root, root, ignored, &mut |path: &Path| {
        if path.is_file() && has_extension(path, extensions) {
            files.push(path.to_path_buf());
        }
    })?;
    Ok(files)
}

/// Collect every subdirectory below `root` (not including `root` itself).
pub fn collect_directories(
    root: &Path,
    ignored: &[String],
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut dirs = Vec::new();
    walk(root, root, ignored, &mut |path: &Path| {
        if path.is_dir() {
            dirs.push(path.to_path_buf());
        }
    })?;
    Ok(dirs)
}

/// Depth-first walk calling `visit` for every non-hidden, non-ignored entry.
fn walk(
    root: &Path,
    dir: &Path,
    ignored: &[String],
    visit: &mut dyn FnMut(&Path),
) -> Result<(), Box<dyn Error>> {
    for path in list_directory(dir)? {
        if is_ignored(root, &path, ignored) {
            continue;
        }

        visit(&path);

        if path.is_dir()
            && let Err(e) = walk(root, &path, ignored, visit)
        {
            log::warn!("Failed to scan directory '{}': {}", path.display(), e);
            eprintln!(
                "Warning: Failed to scan directory '{}': {}",
                path.display(),
                e
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_hidden_file() {
        assert!(is_hidden_file(Path::new(".hidden")));
        assert!(is_hidden_file(Path::new("/path/.hidden")));
        assert!(!is_hidden_file(Path::new("visible")));
    }

    #[test]
    fn test_has_extension() {
        let wanted = exts(&[".mp3", "flac"]);
        assert!(has_extension(Path::new("a.mp3"), &wanted));
        assert!(has_extension(Path::new("a.FLAC"), &wanted));
        assert!(!has_extension(Path::new("a.wav"), &wanted));
        assert!(!has_extension(Path::new("mp3"), &wanted));
    }

    #[test]
    fn test_is_ignored_is_relative_to_root() {
        let root = Path::new("/home/me/downloads/album");
        let ignored = exts(&["downloads"]);
        assert!(!is_ignored(root, &root.join("cd1"), &ignored));
        assert!(is_ignored(root, &root.join("downloads"), &ignored));
    }

    #[test]
    fn test_collect_audio_files_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = collect_audio_files(temp_dir.path(), &exts(&[".wav"]), &[]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_audio_files_nested_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("music");
        fs::create_dir(&subdir).unwrap();
        fs::write(temp_dir.path().join("b.wav"), b"fake").unwrap();
        fs::write(temp_dir.path().join("a.wav"), b"fake").unwrap();
        fs::write(temp_dir.path().join("readme.txt"), b"fake").unwrap();
        fs::write(subdir.join("nested.wav"), b"fake").unwrap();

        let files = collect_audio_files(temp_dir.path(), &exts(&[".wav"]), &[]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.wav", "nested.wav"]);
    }

    #[test]
    fn test_collect_skips_hidden_and_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let skip_dir = temp_dir.path().join("__pycache__");
        fs::create_dir(&skip_dir).unwrap();
        fs::write(skip_dir.join("x.wav"), b"fake").unwrap();
        fs::write(temp_dir.path().join(".hidden.wav"), b"fake").unwrap();
        fs::write(temp_dir.path().join("visible.wav"), b"fake").unwrap();

        let files = collect_audio_files(
            temp_dir.path(),
            &exts(&[".wav"]),
            &exts(&["__pycache__"]),
        )
        .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_collect_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();
        fs::create_dir_all(temp_dir.path().join("c")).unwrap();

        let dirs = collect_directories(temp_dir.path(), &[]).unwrap();
        assert_eq!(dirs.len(), 3);
        assert!(dirs.contains(&temp_dir.path().join("a/b")));
    }
}
