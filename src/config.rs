//! Application configuration management.
//!
//! This module handles the persistent configuration for musictl: where the
//! managed library lives, which top-level music directories exist inside it,
//! which files count as audio, which directories to skip while scanning, and
//! how the external transcoder is invoked. Configuration is stored as YAML in
//! the user's config directory (typically ~/.config/musictl/config.yml).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default = "default_music_directories")]
    pub music_directories: Vec<String>,
    #[serde(default = "default_music_extensions")]
    pub music_extensions: Vec<String>,
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
    #[serde(default)]
    pub splitter: SplitterSettings,
    /// Import log location; `None` keeps it next to the config file.
    #[serde(default)]
    pub import_log: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitterSettings {
    #[serde(default = "default_splitter_binary")]
    pub binary: String,
    #[serde(default = "default_splitter_codec")]
    pub codec: String,
    #[serde(default = "default_splitter_extension")]
    pub extension: String,
}

fn default_base_path() -> String {
    "~/Dropbox".to_string()
}

fn default_music_directories() -> Vec<String> {
    vec![
        "collection".to_string(),
        "inbox".to_string(),
        "dj".to_string(),
    ]
}

fn default_music_extensions() -> Vec<String> {
    vec![
        ".mp3".to_string(),
        ".flac".to_string(),
        ".wav".to_string(),
        ".ogg".to_string(),
        ".m4a".to_string(),
    ]
}

fn default_ignored_dirs() -> Vec<String> {
    vec![
        "downloads".to_string(),
        ".git".to_string(),
        "__pycache__".to_string(),
    ]
}

fn default_splitter_binary() -> String {
    "ffmpeg".to_string()
}

fn default_splitter_codec() -> String {
    "flac".to_string()
}

fn default_splitter_extension() -> String {
    "flac".to_string()
}

impl Default for SplitterSettings {
    fn default() -> Self {
        Self {
            binary: default_splitter_binary(),
            codec: default_splitter_codec(),
            extension: default_splitter_extension(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_path: default_base_path(),
            music_directories: default_music_directories(),
            music_extensions: default_music_extensions(),
            ignored_dirs: default_ignored_dirs(),
            splitter: SplitterSettings::default(),
            import_log: None,
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("musictl")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("musictl")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.yml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            // Return default config instead of error
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        if contents.trim().is_empty() {
            return Ok(Default::default());
        }
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let yaml_string = serde_yaml::to_string(self)?;
        fs::write(&config_path, yaml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// Library root with `~` and environment variables expanded.
    pub fn base_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        let expanded = shellexpand::full(&self.base_path)?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    pub fn import_log_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.import_log {
            Some(path) => Ok(PathBuf::from(shellexpand::tilde(path).as_ref())),
            None => Ok(Self::config_dir()?.join("import.log")),
        }
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "base_path" => self.base_path = value.to_string(),
            "music_directories" => self.music_directories = parse_list(value),
            "music_extensions" => self.music_extensions = parse_list(value),
            "ignored_dirs" => self.ignored_dirs = parse_list(value),
            "import_log" => {
                self.import_log = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "splitter_binary" => self.splitter.binary = value.to_string(),
            "splitter_codec" => self.splitter.codec = value.to_string(),
            "splitter_extension" => {
                let extension = value.trim().trim_start_matches('.');
                if extension.is_empty() {
                    return Err("splitter_extension must not be empty".into());
                }
                self.splitter.extension = extension.to_string();
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}
