//! Cutting a CUE album image into discrete track files with an external
//! transcoder (ffmpeg by default).
//!
//! One transcoder process runs per track, strictly in sheet order. A track
//! that fails is reported and skipped; the remaining tracks still get cut.

use crate::cancel::CancelToken;
use crate::config::SplitterSettings;
use crate::cue::CueTrack;
use crate::media::sanitize_file_name;
use crate::utils::progress::split_progress_bar;
use owo_colors::OwoColorize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("transcoder '{binary}' is not available: {reason}")]
    SplitterUnavailable { binary: String, reason: String },
}

/// A track file produced by the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTrack {
    pub track: CueTrack,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AudioSplitter {
    binary: String,
    codec: String,
    extension: String,
    cancel: CancelToken,
}

impl AudioSplitter {
    pub fn new(settings: &SplitterSettings) -> Self {
        Self {
            binary: settings.binary.clone(),
            codec: settings.codec.clone(),
            extension: settings.extension.trim_start_matches('.').to_string(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Probe the transcoder once with `-version`.
    pub fn check_available(&self) -> Result<(), SplitError> {
        let unavailable = |reason: String| SplitError::SplitterUnavailable {
            binary: self.binary.clone(),
            reason,
        };

        let status = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    unavailable("not found on PATH".to_string())
                } else {
                    unavailable(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(unavailable(format!("'-version' exited with {status}")));
        }
        Ok(())
    }

    pub fn output_file_name(&self, track: &CueTrack) -> String {
        sanitize_file_name(&format!(
            "{:02} - {}.{}",
            track.number, track.title, self.extension
        ))
    }

    /// Arguments for one transcoder run, in the order the transcoder expects.
    pub fn command_args(&self, input: &Path, track: &CueTrack, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            input.into(),
            "-ss".into(),
            track.start_time.to_external_format().into(),
        ];
        if let Some(end) = track.end_time {
            args.push("-to".into());
            args.push(end.to_external_format().into());
        }
        args.extend(
            [
                "-c:a".to_string(),
                self.codec.clone(),
                "-avoid_negative_ts".to_string(),
                "make_zero".to_string(),
                "-metadata".to_string(),
                format!("title={}", track.title),
                "-metadata".to_string(),
                format!("artist={}", track.performer),
                "-metadata".to_string(),
                format!("album={}", track.album),
                "-metadata".to_string(),
                format!("track={}", track.number),
            ]
            .map(OsString::from),
        );
        args.push(output.into());
        args
    }

    /// Cut `tracks` out of `audio_file` into `output_dir`.
    ///
    /// Only an unavailable transcoder is an error. Failed tracks are left out
    /// of the result, as are tracks after a cancellation.
    pub fn split(
        &self,
        audio_file: &Path,
        tracks: &[CueTrack],
        output_dir: &Path,
    ) -> Result<Vec<SplitTrack>, SplitError> {
        self.check_available()?;

        let mut produced = Vec::with_capacity(tracks.len());
        let pb = split_progress_bar(tracks.len());

        for track in tracks {
            if self.cancel.is_cancelled() {
                log::warn!("Splitting of {} cancelled", audio_file.display());
                break;
            }

            pb.set_message(track.title.clone());
            let output = output_dir.join(self.output_file_name(track));

            match self.run_track(audio_file, track, &output) {
                Ok(()) => {
                    log::info!("Split track {} to {}", track.number, output.display());
                    produced.push(SplitTrack {
                        track: track.clone(),
                        path: output,
                    });
                }
                Err(reason) => {
                    log::warn!("Failed to split track {}: {reason}", track.number);
                    pb.suspend(|| {
                        eprintln!(
                            "  {} Failed to split track {:02} ({}): {}",
                            "Error:".red(),
                            track.number,
                            track.title,
                            reason.bright_black()
                        )
                    });
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(produced)
    }

    fn run_track(&self, input: &Path, track: &CueTrack, output: &Path) -> Result<(), String> {
        let result = Command::new(&self.binary)
            .args(self.command_args(input, track, output))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("failed to launch '{}': {e}", self.binary))?;

        if result.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr);
        let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty());
        Err(match last_line {
            Some(line) => format!("{} ({})", result.status, line.trim()),
            None => result.status.to_string(),
        })
    }
}
