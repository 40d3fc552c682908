/*!
 * Error types for the typocat application.
 *
 * Each stage of a run has its own error enum so callers can decide how far a
 * failure propagates: configuration errors stop the run before any catalog is
 * read, dictionary and catalog errors stop a single catalog check, and
 * malformed texts only skip the text they were found in.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or interpreting the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required option is absent or empty
    #[error("Missing required configuration option: {0}")]
    MissingOption(&'static str),

    /// A chunker identifier is not registered
    #[error("Unknown chunker '{0}'")]
    UnknownChunker(String),

    /// A filter identifier is not registered
    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    /// A language code could not be resolved
    #[error("Invalid language code for {option}: {code}")]
    InvalidLanguage {
        /// Option that carried the code
        option: &'static str,
        /// The rejected code
        code: String,
    },

    /// The configuration file could not be read or parsed
    #[error("Failed to load configuration from {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },
}

/// Errors raised while building a dictionary adapter
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// No dictionary files exist for the language
    #[error("Dictionary not found for language '{language}' (searched {searched:?})")]
    NotFound { language: String, searched: PathBuf },

    /// Dictionary files exist but could not be parsed
    #[error("Failed to parse dictionary for language '{language}': {reason}")]
    Parse { language: String, reason: String },

    /// The ignore file exists but could not be read
    #[error("Failed to read ignore file {path:?}: {source}")]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure while reading dictionary files
    #[error("Failed to read dictionary file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading a catalog file
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The file could not be read
    #[error("Failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a structurally valid catalog
    #[error("Malformed catalog {path:?} at line {line}: {reason}")]
    Syntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Neither the header nor the path tells which language the file is in
    #[error("Cannot determine the language of catalog {0:?}")]
    UnknownLanguage(PathBuf),
}

/// Errors raised while validating a single text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The text could not be decoded cleanly
    #[error("Malformed text: {0}")]
    MalformedText(String),
}

/// Errors that stop a single catalog check
#[derive(Error, Debug)]
pub enum CatalogCheckError {
    /// Error from the catalog parser
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from the target dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// The check was run before its dictionary was loaded
    #[error("Dictionary for {0:?} has not been loaded")]
    DictionaryNotLoaded(PathBuf),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error building the shared source dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from a single catalog check
    #[error("Check error: {0}")]
    Check(#[from] CatalogCheckError),

    /// Error preparing or writing output artifacts
    #[error("Output error: {0}")]
    Output(String),

    /// Error walking the locales directory
    #[error("File error: {0}")]
    File(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Output(error.to_string())
    }
}
