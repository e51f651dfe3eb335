pub mod cancel;
pub mod config;
pub mod constants;
pub mod cue;
pub mod import;
pub mod media;
pub mod splitter;
pub mod utils;
