//! CUE sheet time codes.
//!
//! CUE sheets address positions as `MM:SS:FF` where `FF` counts CD audio
//! frames (75 per second). Transcoders do not understand frames, so offsets are
//! rendered as `HH:MM:SS.mmm` before they leave this module.

use crate::constants::FRAMES_PER_SECOND;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeCodeError {
    #[error("malformed time code '{0}': expected MM:SS:FF")]
    MalformedTimeCode(String),
}

/// A position inside a CUE album image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeCode {
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl TimeCode {
    pub const ZERO: TimeCode = TimeCode {
        minutes: 0,
        seconds: 0,
        frames: 0,
    };

    /// Parse a `MM:SS:FF` code. Seconds must be below 60 and frames below 75.
    pub fn parse(text: &str) -> Result<Self, TimeCodeError> {
        let malformed = || TimeCodeError::MalformedTimeCode(text.to_string());

        let fields: Vec<&str> = text.trim().split(':').collect();
        let [minutes, seconds, frames] = fields.as_slice() else {
            return Err(malformed());
        };

        let minutes: u32 = minutes.trim().parse().map_err(|_| malformed())?;
        let seconds: u32 = seconds.trim().parse().map_err(|_| malformed())?;
        let frames: u32 = frames.trim().parse().map_err(|_| malformed())?;

        if seconds >= 60 || frames >= FRAMES_PER_SECOND {
            return Err(malformed());
        }

        Ok(Self {
            minutes,
            seconds,
            frames,
        })
    }

    /// Frames converted to milliseconds, rounded to the nearest millisecond.
    fn frame_millis(&self) -> u64 {
        let fps = FRAMES_PER_SECOND as u64;
        (self.frames as u64 * 1000 * 2 + fps) / (2 * fps)
    }

    pub fn total_millis(&self) -> u64 {
        (self.minutes as u64 * 60 + self.seconds as u64) * 1000 + self.frame_millis()
    }

    pub fn to_offset(&self) -> Duration {
        Duration::from_millis(self.total_millis())
    }

    /// Render as `HH:MM:SS.mmm` for the external transcoder.
    pub fn to_external_format(&self) -> String {
        let total_seconds = self.minutes as u64 * 60 + self.seconds as u64;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!(
            "{hours:02}:{minutes:02}:{seconds:02}.{:03}",
            self.frame_millis()
        )
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.frames
        )
    }
}

impl FromStr for TimeCode {
    type Err = TimeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
