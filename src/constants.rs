//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency across the codebase.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// File extension of CUE sheets
pub const CUE_EXTENSION: &str = "cue";

/// Album image extensions a CUE sheet may describe, in preference order
pub const CUE_AUDIO_EXTENSIONS: &[&str] = &["flac", "wav", "ape"];

/// Characters replaced with an underscore in generated file names
pub const HOSTILE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Track number used when none can be determined
pub const UNKNOWN_TRACK_NUMBER: &str = "00";

/// Name of the per-import month directory inside a target subdirectory
pub const IMPORT_PERIOD_FORMAT: &str = "%Y-%m";

/// Timestamp format of import log entries
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CD audio frames per second
pub const FRAMES_PER_SECOND: u32 = 75;
