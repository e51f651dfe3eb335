//! Progress indicators for the import pipeline.
//!
//! Scanning a source directory shows a spinner; splitting an image and
//! copying into the library show a bar counted in tracks or files.

use crate::constants::SPINNER_CHARS;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "{prefix:>9.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

fn styled(template: &str, fallback: ProgressStyle) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or(fallback)
}

fn counted_bar(prefix: &'static str, total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64).with_prefix(prefix);
    pb.set_style(styled(BAR_TEMPLATE, ProgressStyle::default_bar()).progress_chars("█▓░"));
    pb
}

/// Spinner shown while `source` is walked for CUE pairs and audio files.
pub fn scan_spinner(source: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        styled(SPINNER_TEMPLATE, ProgressStyle::default_spinner()).tick_strings(SPINNER_CHARS),
    );
    spinner.set_message(format!("Scanning {}", source.display()));
    spinner
}

/// Bar over the tracks of one album image; the message names the current track.
pub fn split_progress_bar(tracks: usize) -> ProgressBar {
    counted_bar("Splitting", tracks)
}

/// Bar over the files being copied into the library.
pub fn copy_progress_bar(files: usize) -> ProgressBar {
    counted_bar("Copying", files)
}
