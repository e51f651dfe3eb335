//! The import pipeline.
//!
//! Importing moves a directory of downloaded music into the library:
//!
//! 1. discover CUE pairs and plain audio files below the source
//! 2. optionally split each CUE album image into tracks (scratch directory)
//! 3. give every file its canonical name
//! 4. copy into `{base}/{root}/{subdir}/{YYYY-MM}` without overwriting
//! 5. record each copy in the import log
//! 6. optionally delete the originals that made it into the library
//!
//! Anything that fails for a single file is reported and counted, never fatal.

pub mod history;
pub mod prompt;
pub mod report;

pub use history::{ImportLog, ImportLogEntry};
pub use prompt::{AssumeYes, ConsolePrompt, Prompt};

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::constants::IMPORT_PERIOD_FORMAT;
use crate::cue::{self, CuePair, CueSheet, find_pairs_recursive};
use crate::media::{MetadataResolver, TrackFileRecord};
use crate::splitter::AudioSplitter;
use crate::utils::progress::{copy_progress_bar, scan_spinner};
use crate::utils::scan::collect_audio_files;
use crate::utils::validation::{ImportTarget, ValidationError, validate_source_dir};
use owo_colors::OwoColorize;
use std::collections::HashSet;
use std::error::Error;
use std::fs::{self, File, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] io::Error),
    #[error("failed to create target directory {}: {source}", path.display())]
    TargetDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub copied: usize,
    /// Files whose canonical name already existed in the target directory.
    pub skipped: usize,
    pub failed: usize,
    /// Tracks cut from CUE album images.
    pub extracted: usize,
    pub split_failures: usize,
    pub deleted: usize,
    pub delete_failures: usize,
    pub target_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ImportOutcome {
    Completed(ImportSummary),
    NothingToDo,
    Rejected(ValidationError),
    Interrupted(ImportSummary),
}

/// What discovery found below the source directory.
#[derive(Debug, Default)]
struct Discovery {
    pairs: Vec<CuePair>,
    audio_files: Vec<PathBuf>,
}

/// A file ready to be copied under its canonical name.
#[derive(Debug)]
struct StagedFile {
    record: TrackFileRecord,
    /// Where the bytes are read from: the source file, or the scratch copy.
    staged_path: PathBuf,
    origin: Origin,
}

#[derive(Debug, Clone, Copy)]
enum Origin {
    Plain,
    /// Index into the processed pairs.
    Extracted(usize),
}

#[derive(Debug)]
struct ProcessedPair {
    pair: CuePair,
    expected: usize,
    produced: usize,
    landed: usize,
}

impl ProcessedPair {
    /// At least one track was cut from the image.
    fn was_split(&self) -> bool {
        self.produced > 0
    }

    /// Every declared track was cut and is now in the library.
    fn is_complete(&self) -> bool {
        self.expected > 0 && self.produced == self.expected && self.landed == self.produced
    }
}

enum CopyResult {
    Copied,
    AlreadyPresent,
}

pub struct ImportPipeline<'a> {
    config: &'a Config,
    prompt: &'a dyn Prompt,
    base_path: PathBuf,
    log: ImportLog,
    resolver: MetadataResolver,
    cancel: CancelToken,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(config: &'a Config, prompt: &'a dyn Prompt) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            config,
            prompt,
            base_path: config.base_path()?,
            log: ImportLog::new(config.import_log_path()?),
            resolver: MetadataResolver::default(),
            cancel: CancelToken::new(),
        })
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Import everything below `source` into the library location `target`
    /// (`root/subdir`).
    pub fn run(&self, target: &str, source: &Path) -> Result<ImportOutcome, ImportError> {
        let target = match ImportTarget::parse(target, &self.config.music_directories) {
            Ok(target) => target,
            Err(e) => return Ok(ImportOutcome::Rejected(e)),
        };
        if let Err(e) = validate_source_dir(source) {
            return Ok(ImportOutcome::Rejected(e));
        }

        let discovery = self.discover(source);
        if discovery.pairs.is_empty() && discovery.audio_files.is_empty() {
            log::info!("Nothing to import in {}", source.display());
            return Ok(ImportOutcome::NothingToDo);
        }

        let mut summary = ImportSummary::default();
        // Dropped on every return below, which removes all extraction output.
        let mut scratch: Option<TempDir> = None;

        let sheets = self.load_sheets(&discovery.pairs);
        let image_paths: HashSet<&Path> = discovery
            .pairs
            .iter()
            .map(|pair| pair.audio_path.as_path())
            .collect();

        let mut staged = Vec::new();
        let mut processed = Vec::new();

        if !sheets.is_empty() {
            for (pair, sheet) in &sheets {
                report::print_cue_listing(&pair.cue_path, Some(&pair.audio_path), sheet);
            }
            println!();
            let question = format!("Split {} CUE album image(s) into tracks?", sheets.len());
            let split = self.prompt.confirm(&question);
            if self.cancel.is_cancelled() {
                return Ok(ImportOutcome::Interrupted(summary));
            }

            if split {
                let dir = tempfile::Builder::new()
                    .prefix("musictl-")
                    .tempdir()
                    .map_err(ImportError::TempDir)?;
                log::debug!("Extracting into {}", dir.path().display());
                let dir = scratch.insert(dir);
                self.extract(&sheets, dir.path(), &mut summary, &mut staged, &mut processed);
            } else {
                println!("{} Skipping CUE albums", "→".bright_black());
            }
        }

        if self.cancel.is_cancelled() {
            return Ok(ImportOutcome::Interrupted(summary));
        }

        for file in discovery
            .audio_files
            .iter()
            .filter(|f| !image_paths.contains(f.as_path()))
        {
            staged.push(StagedFile {
                record: self.resolver.resolve(file),
                staged_path: file.clone(),
                origin: Origin::Plain,
            });
        }

        let period = chrono::Local::now().format(IMPORT_PERIOD_FORMAT).to_string();
        let target_dir = target.directory(&self.base_path, &period);
        fs::create_dir_all(&target_dir).map_err(|source| ImportError::TargetDir {
            path: target_dir.clone(),
            source,
        })?;
        summary.target_dir = Some(target_dir.clone());

        let mut copied_sources = Vec::new();
        if !self.copy_all(&staged, &target_dir, &mut summary, &mut processed, &mut copied_sources) {
            return Ok(ImportOutcome::Interrupted(summary));
        }

        let any_pair_processed = processed.iter().any(ProcessedPair::was_split);
        if summary.copied > 0 || any_pair_processed {
            self.offer_deletion(&copied_sources, &processed, &mut summary);
        }

        if self.cancel.is_cancelled() {
            return Ok(ImportOutcome::Interrupted(summary));
        }
        drop(scratch);
        Ok(ImportOutcome::Completed(summary))
    }

    fn discover(&self, source: &Path) -> Discovery {
        let spinner = scan_spinner(source);

        let ignored = &self.config.ignored_dirs;
        let pairs = find_pairs_recursive(source, ignored).unwrap_or_else(|e| {
            log::warn!("Failed to look for CUE sheets in {}: {e}", source.display());
            Vec::new()
        });
        let audio_files = collect_audio_files(source, &self.config.music_extensions, ignored)
            .unwrap_or_else(|e| {
                log::warn!("Failed to scan {}: {e}", source.display());
                Vec::new()
            });

        spinner.finish_and_clear();
        log::info!(
            "Found {} CUE pair(s) and {} audio file(s) in {}",
            pairs.len(),
            audio_files.len(),
            source.display()
        );
        Discovery { pairs, audio_files }
    }

    fn load_sheets(&self, pairs: &[CuePair]) -> Vec<(CuePair, CueSheet)> {
        pairs
            .iter()
            .filter_map(|pair| match cue::parse_file(&pair.cue_path) {
                Ok(sheet) if sheet.is_empty() => {
                    eprintln!(
                        "{} No tracks in {}, skipping",
                        "Warning:".yellow(),
                        pair.cue_path.display()
                    );
                    None
                }
                Ok(sheet) => Some((pair.clone(), sheet)),
                Err(e) => {
                    eprintln!(
                        "{} {}: {e}",
                        "Warning:".yellow(),
                        pair.cue_path.display()
                    );
                    None
                }
            })
            .collect()
    }

    fn extract(
        &self,
        sheets: &[(CuePair, CueSheet)],
        scratch: &Path,
        summary: &mut ImportSummary,
        staged: &mut Vec<StagedFile>,
        processed: &mut Vec<ProcessedPair>,
    ) {
        let splitter =
            AudioSplitter::new(&self.config.splitter).with_cancel_token(self.cancel.clone());

        for (index, (pair, sheet)) in sheets.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return;
            }

            // One subdirectory per image so equal track names never collide.
            let pair_dir = scratch.join(format!("{:03}", index + 1));
            if let Err(e) = fs::create_dir(&pair_dir) {
                eprintln!(
                    "{} Failed to prepare {}: {e}",
                    "Error:".red(),
                    pair_dir.display()
                );
                summary.split_failures += sheet.tracks.len();
                continue;
            }

            println!(
                "{} {}",
                "Splitting".cyan(),
                pair.audio_path.display().to_string().bright_black()
            );
            let outputs = match splitter.split(&pair.audio_path, &sheet.tracks, &pair_dir) {
                Ok(outputs) => outputs,
                Err(e) => {
                    eprintln!("{} {e}; skipping CUE albums", "Error:".red());
                    log::error!("{e}");
                    return;
                }
            };

            let pair_index = processed.len();
            let mut produced = 0;
            for output in outputs {
                let record = TrackFileRecord::from_cue_track(&output.path, &output.track);
                let renamed = pair_dir.join(record.file_name());
                if let Err(e) = fs::rename(&output.path, &renamed) {
                    eprintln!(
                        "{} Failed to rename {}: {e}",
                        "Error:".red(),
                        output.path.display()
                    );
                    continue;
                }
                produced += 1;
                staged.push(StagedFile {
                    record,
                    staged_path: renamed,
                    origin: Origin::Extracted(pair_index),
                });
            }

            summary.extracted += produced;
            summary.split_failures += sheet.tracks.len() - produced;
            processed.push(ProcessedPair {
                pair: pair.clone(),
                expected: sheet.tracks.len(),
                produced,
                landed: 0,
            });
        }
    }

    /// Copy every staged file. Returns `false` when cancelled part way.
    fn copy_all(
        &self,
        staged: &[StagedFile],
        target_dir: &Path,
        summary: &mut ImportSummary,
        processed: &mut [ProcessedPair],
        copied_sources: &mut Vec<PathBuf>,
    ) -> bool {
        let pb = copy_progress_bar(staged.len());

        for file in staged {
            if self.cancel.is_cancelled() {
                pb.finish_and_clear();
                return false;
            }

            let target = file.record.target_path(target_dir);
            pb.set_message(file.record.file_name());

            let landed = match copy_preserving_times(&file.staged_path, &target) {
                Ok(CopyResult::Copied) => {
                    summary.copied += 1;
                    let source = match file.origin {
                        Origin::Plain => &file.staged_path,
                        Origin::Extracted(i) => &processed[i].pair.audio_path,
                    };
                    if let Err(e) = self.log.append(&ImportLogEntry::now(source, &target)) {
                        log::warn!("Failed to write import log: {e}");
                        pb.suspend(|| {
                            eprintln!(
                                "{} Failed to write import log {}: {e}",
                                "Warning:".yellow(),
                                self.log.path().display()
                            )
                        });
                    }
                    if let Origin::Plain = file.origin {
                        copied_sources.push(file.staged_path.clone());
                    }
                    true
                }
                Ok(CopyResult::AlreadyPresent) => {
                    log::info!("Skipping {}, already present", target.display());
                    summary.skipped += 1;
                    true
                }
                Err(e) => {
                    log::warn!("Failed to copy {}: {e}", file.staged_path.display());
                    pb.suspend(|| {
                        eprintln!(
                            "  {} {}: {}",
                            "Error:".red(),
                            file.staged_path.display(),
                            e.to_string().bright_black()
                        )
                    });
                    summary.failed += 1;
                    false
                }
            };

            if let (true, Origin::Extracted(i)) = (landed, file.origin) {
                processed[i].landed += 1;
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        true
    }

    fn offer_deletion(
        &self,
        copied_sources: &[PathBuf],
        processed: &[ProcessedPair],
        summary: &mut ImportSummary,
    ) {
        let mut candidates: Vec<&Path> = copied_sources.iter().map(PathBuf::as_path).collect();
        for pair in processed.iter().filter(|p| p.was_split()) {
            if !pair.is_complete() {
                println!(
                    "{} {}: only {} of {} tracks made it into the library",
                    "Warning:".yellow(),
                    pair.pair.cue_path.display(),
                    pair.landed,
                    pair.expected
                );
            }
            candidates.push(&pair.pair.cue_path);
            candidates.push(&pair.pair.audio_path);
        }

        let question = format!("Delete {} original file(s)?", candidates.len());
        let confirmed = self.prompt.confirm(&question);
        if !confirmed || self.cancel.is_cancelled() {
            return;
        }

        for path in candidates {
            match fs::remove_file(path) {
                Ok(()) => {
                    log::info!("Deleted {}", path.display());
                    summary.deleted += 1;
                }
                Err(e) => {
                    eprintln!(
                        "{} Failed to delete {}: {e}",
                        "Error:".red(),
                        path.display()
                    );
                    summary.delete_failures += 1;
                }
            }
        }
    }
}

/// Copy `from` to `to` unless `to` exists, keeping access and modification times.
fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<CopyResult> {
    let metadata = fs::metadata(from)?;
    let mut reader = File::open(from)?;
    let mut writer = match OpenOptions::new().write(true).create_new(true).open(to) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(CopyResult::AlreadyPresent);
        }
        Err(e) => return Err(e),
    };

    let written = io::copy(&mut reader, &mut writer).and_then(|_| {
        let mut times = FileTimes::new();
        if let Ok(modified) = metadata.modified() {
            times = times.set_modified(modified);
        }
        if let Ok(accessed) = metadata.accessed() {
            times = times.set_accessed(accessed);
        }
        writer.set_times(times)
    });

    if let Err(e) = written {
        drop(writer);
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(CopyResult::Copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_copy_preserves_modification_time() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.mp3");
        let to = temp_dir.path().join("b.mp3");
        fs::write(&from, b"audio").unwrap();

        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_times(FileTimes::new().set_modified(past))
            .unwrap();

        assert!(matches!(
            copy_preserving_times(&from, &to).unwrap(),
            CopyResult::Copied
        ));
        assert_eq!(fs::read(&to).unwrap(), b"audio");
        assert_eq!(fs::metadata(&to).unwrap().modified().unwrap(), past);
    }

    #[test]
    fn test_copy_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.mp3");
        let to = temp_dir.path().join("b.mp3");
        fs::write(&from, b"new").unwrap();
        fs::write(&to, b"old").unwrap();

        assert!(matches!(
            copy_preserving_times(&from, &to).unwrap(),
            CopyResult::AlreadyPresent
        ));
        assert_eq!(fs::read(&to).unwrap(), b"old");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let to = temp_dir.path().join("b.mp3");
        assert!(copy_preserving_times(&temp_dir.path().join("missing.mp3"), &to).is_err());
        assert!(!to.exists());
    }

    #[test]
    fn test_pair_split_and_completeness() {
        let pair = |expected, produced, landed| ProcessedPair {
            pair: CuePair {
                cue_path: PathBuf::from("a.cue"),
                audio_path: PathBuf::from("a.flac"),
            },
            expected,
            produced,
            landed,
        };
        assert!(pair(3, 3, 3).is_complete());
        assert!(!pair(3, 2, 2).is_complete());
        assert!(pair(3, 2, 2).was_split());
        assert!(!pair(3, 3, 2).is_complete());
        assert!(!pair(0, 0, 0).is_complete());
        assert!(!pair(3, 0, 0).was_split());
    }
}
