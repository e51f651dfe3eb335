//! Path and input validation utilities.
//!
//! This module provides common validation functions to ensure consistent
//! error handling across the codebase.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Validate that a path exists and return an error if it doesn't.
///
/// # Arguments
///
/// * `path` - The path to validate
///
/// # Returns
///
/// * `Ok(())` if the path exists
/// * `Err` with a formatted error message if the path doesn't exist
pub fn validate_path_exists(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "{} Path does not exist: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }
    Ok(())
}

/// Reasons an import is refused before anything on disk changes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Source directory does not exist: {}", .0.display())]
    MissingSource(PathBuf),
    #[error("Source is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Invalid target '{target}': expected <root>/<subdir> where root is one of: {}", .available.join(", "))]
    InvalidTarget {
        target: String,
        available: Vec<String>,
    },
}

pub fn validate_source_dir(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::MissingSource(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ValidationError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// A `root/subdir` import destination inside the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub root: String,
    pub subdir: String,
}

impl ImportTarget {
    /// Parse `root/subdir`; `root` must be one of the configured music directories.
    pub fn parse(spec: &str, music_directories: &[String]) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTarget {
            target: spec.to_string(),
            available: music_directories.to_vec(),
        };

        let components: Vec<&str> = Path::new(spec.trim())
            .components()
            .map(|c| match c {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        let [root, subdir] = components.as_slice() else {
            return Err(invalid());
        };
        if !music_directories.iter().any(|dir| dir == root) {
            return Err(invalid());
        }

        Ok(Self {
            root: root.to_string(),
            subdir: subdir.to_string(),
        })
    }

    /// `{base}/{root}/{subdir}/{period}`
    pub fn directory(&self, base: &Path, period: &str) -> PathBuf {
        base.join(&self.root).join(&self.subdir).join(period)
    }
}
