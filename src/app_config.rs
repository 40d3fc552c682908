use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles loading and validating the configuration that drives
/// a spell-check run. The configuration is read once and passed down
/// explicitly; nothing reads it from global state.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Chunker identifiers, in order
    #[serde(default = "default_chunkers", deserialize_with = "comma_list")]
    pub chunkers: Vec<String>,

    /// Filter identifiers, in order
    #[serde(default, deserialize_with = "comma_list")]
    pub filters: Vec<String>,

    /// Phrases that are accepted as a whole
    #[serde(default, deserialize_with = "optional_line_list")]
    pub phrases: Option<Vec<String>>,

    /// Words that are never reported
    #[serde(default, deserialize_with = "optional_line_list")]
    pub edgecase_words: Option<Vec<String>>,

    /// Output directory, recreated on every run when set
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// Root searched for catalog files
    #[serde(default)]
    pub locales_dir: PathBuf,

    /// Directory holding `<language>.txt` ignore files
    #[serde(default)]
    pub ignores_dir: PathBuf,

    /// Language of the message ids
    #[serde(default)]
    pub default_language: String,

    /// Directory holding Hunspell `.aff`/`.dic` pairs
    #[serde(default = "default_dictionaries_dir")]
    pub dictionaries_dir: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_chunkers() -> Vec<String> {
    vec!["words".to_string()]
}

fn default_dictionaries_dir() -> PathBuf {
    PathBuf::from("/usr/share/hunspell")
}

// Lists are either a JSON array or one delimited string
#[derive(Deserialize)]
#[serde(untagged)]
enum ListValue {
    Text(String),
    Items(Vec<String>),
}

impl ListValue {
    fn into_items(self, separator: char) -> Vec<String> {
        let raw = match self {
            ListValue::Text(text) => text.split(separator).map(str::to_string).collect(),
            ListValue::Items(items) => items,
        };
        raw.into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

fn comma_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ListValue::deserialize(deserializer)?.into_items(','))
}

fn optional_line_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<ListValue> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.into_items('\n'))
        .filter(|items| !items.is_empty()))
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ConfigError::Load { path: path.to_path_buf(), reason: e.to_string() })?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| ConfigError::Load { path: path.to_path_buf(), reason: e.to_string() })?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.locales_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingOption("locales_dir"));
        }
        if self.ignores_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingOption("ignores_dir"));
        }
        if self.default_language.trim().is_empty() {
            return Err(ConfigError::MissingOption("default_language"));
        }

        language_utils::normalize_locale(&self.default_language).map_err(|_| {
            ConfigError::InvalidLanguage {
                option: "default_language",
                code: self.default_language.clone(),
            }
        })?;

        Ok(())
    }

    /// Chunker identifiers, falling back to the word chunker when none are listed
    pub fn effective_chunkers(&self) -> Vec<String> {
        if self.chunkers.is_empty() {
            default_chunkers()
        } else {
            self.chunkers.clone()
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            chunkers: default_chunkers(),
            filters: Vec::new(),
            phrases: None,
            edgecase_words: None,
            build_dir: None,
            locales_dir: PathBuf::new(),
            ignores_dir: PathBuf::new(),
            default_language: String::new(),
            dictionaries_dir: default_dictionaries_dir(),
            log_level: LogLevel::default(),
        }
    }
}
