//! CUE sheet parsing.
//!
//! A CUE sheet describes how a single album image decomposes into tracks. Only
//! the directives needed to split an image are interpreted (`TITLE`,
//! `PERFORMER`, `FILE`, `TRACK`, `INDEX 01`); everything else is ignored. The
//! parser is total: odd lines produce warnings and defaults, never errors.

pub mod locator;
pub mod timecode;

pub use locator::{CuePair, find_pairs, find_pairs_recursive};
pub use timecode::{TimeCode, TimeCodeError};

use crate::constants::{UNKNOWN_ALBUM, UNKNOWN_ARTIST};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error("failed to read CUE sheet: {0}")]
    Io(#[from] std::io::Error),
    /// Unreachable while the Latin-1 fallback accepts every byte sequence.
    #[error("CUE sheet could not be decoded with any supported encoding")]
    UnreadableEncoding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrack {
    pub number: u32,
    pub title: String,
    pub performer: String,
    pub start_time: TimeCode,
    /// Start of the following track; `None` runs to the end of the image.
    pub end_time: Option<TimeCode>,
    pub album: String,
}

impl fmt::Display for CueTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {:02}. {}",
            self.performer, self.album, self.number, self.title
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    pub album_title: String,
    pub album_artist: String,
    /// Name given by the sheet's `FILE` directive, if any.
    pub file: Option<String>,
    pub tracks: Vec<CueTrack>,
}

impl CueSheet {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Decode raw sheet bytes: UTF-8, then Windows-1251, then Latin-1.
pub fn decode_cue_text(bytes: &[u8]) -> Result<Cow<'_, str>, CueError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(Cow::Borrowed(text));
    }

    if let Some(text) =
        encoding_rs::WINDOWS_1251.decode_without_bom_handling_and_without_replacement(bytes)
    {
        log::debug!("CUE sheet decoded as windows-1251");
        return Ok(text);
    }

    log::debug!("CUE sheet decoded as latin-1");
    Ok(Cow::Owned(decode_latin1(bytes)))
}

/// Every byte maps to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub fn parse_file(path: &Path) -> Result<CueSheet, CueError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

pub fn parse(raw: &[u8]) -> Result<CueSheet, CueError> {
    let text = decode_cue_text(raw)?;
    Ok(parse_text(&text))
}

/// Track fields collected while scanning, before end times are known.
struct PendingTrack {
    number: u32,
    title: String,
    performer: String,
    start_time: TimeCode,
}

pub fn parse_text(text: &str) -> CueSheet {
    let mut album_title: Option<String> = None;
    let mut album_artist: Option<String> = None;
    let mut file = None;
    let mut pending: Vec<PendingTrack> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        let Some((keyword, rest)) = split_directive(line) else {
            continue;
        };

        if keyword == "TRACK" {
            let position = pending.len() as u32 + 1;
            let number = match rest.split_whitespace().next().map(str::parse::<u32>) {
                Some(Ok(n)) => n,
                _ => {
                    log::warn!(
                        "line {}: unreadable TRACK number '{rest}', using {position}",
                        line_no + 1
                    );
                    position
                }
            };
            let performer = album_artist
                .clone()
                .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
            pending.push(PendingTrack {
                number,
                title: format!("Track {number}"),
                performer,
                start_time: TimeCode::ZERO,
            });
            continue;
        }

        match (keyword, pending.last_mut()) {
            ("TITLE", None) => {
                album_title.get_or_insert_with(|| unquote(rest).to_string());
            }
            ("PERFORMER", None) => {
                album_artist.get_or_insert_with(|| unquote(rest).to_string());
            }
            ("FILE", None) => {
                file.get_or_insert_with(|| file_name_of(rest));
            }
            ("TITLE", Some(track)) => track.title = unquote(rest).to_string(),
            ("PERFORMER", Some(track)) => track.performer = unquote(rest).to_string(),
            ("INDEX", Some(track)) => {
                let mut parts = rest.split_whitespace();
                if parts.next() != Some("01") {
                    continue;
                }
                let code = parts.next().unwrap_or_default();
                match TimeCode::parse(code) {
                    Ok(tc) => track.start_time = tc,
                    Err(e) => log::warn!("line {}: {e}", line_no + 1),
                }
            }
            _ => {}
        }
    }

    let album_title = album_title.unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
    let album_artist = album_artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    let end_times: Vec<Option<TimeCode>> = pending
        .iter()
        .skip(1)
        .map(|next| Some(next.start_time))
        .chain(std::iter::once(None))
        .collect();

    let tracks = pending
        .into_iter()
        .zip(end_times)
        .map(|(track, end_time)| CueTrack {
            number: track.number,
            title: track.title,
            performer: track.performer,
            start_time: track.start_time,
            end_time,
            album: album_title.clone(),
        })
        .collect();

    CueSheet {
        album_title,
        album_artist,
        file,
        tracks,
    }
}

/// Split `KEYWORD rest` at the first whitespace. Keywords are case-sensitive.
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let (keyword, rest) = line.split_once(char::is_whitespace)?;
    Some((keyword, rest.trim()))
}

/// Strip exactly one leading and one trailing double quote.
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// `FILE "name.flac" WAVE` carries a trailing type token after the name.
fn file_name_of(rest: &str) -> String {
    if let Some(quoted) = rest.strip_prefix('"')
        && let Some(end) = quoted.find('"')
    {
        return quoted[..end].to_string();
    }
    match rest.rsplit_once(char::is_whitespace) {
        Some((name, _kind)) => name.trim().to_string(),
        None => rest.to_string(),
    }
}
