pub mod config;
pub mod cue;
pub mod history;
pub mod import;
pub mod init;
