/*!
 * # typocat - spell checking for gettext catalogs
 *
 * A Rust library that finds misspelled words in `.po` translation catalogs.
 *
 * ## Features
 *
 * - Source texts (`msgid`) are checked against the default-language
 *   dictionary, translations (`msgstr`) against the catalog's own language
 * - Hunspell dictionaries loaded through `spellbook`
 * - Per-language ignore files and project-wide edge-case words
 * - Pluggable chunkers (how text is cut into words) and filters (which words
 *   are skipped), selected by name in the configuration
 * - Multi-word phrases accepted as a whole
 * - Console report plus per-language output files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: `.po` parsing
 * - `spelling`: Chunkers, filters, dictionaries and the entry validator:
 *   - `spelling::chunkers`: Text to tokens
 *   - `spelling::filters`: Token predicates
 *   - `spelling::dictionary`: Dictionary adapter and lexicon sources
 *   - `spelling::registry`: Name to chunker/filter factories
 *   - `spelling::validator`: Pipeline and entry validation
 * - `check`: Spell check of one catalog file
 * - `report`: Findings, output sinks and run summary
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Gettext locale and ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod check;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod report;
pub mod spelling;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use catalog::{Catalog, CatalogEntry, TextField};
pub use check::{CatalogCheck, CheckOutcome, CheckState};
pub use errors::{AppError, CatalogCheckError, CatalogError, CheckError, ConfigError, DictionaryError};
pub use language_utils::{get_language_name, normalize_locale};
pub use report::{Finding, Reporter, RunSummary, TextSide};
