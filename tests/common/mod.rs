/*!
 * Common test utilities for the typocat test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typocat::spelling::MemorySource;
use typocat::{Config, Controller, Reporter, RunSummary};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file, and its parent directories, below `dir`
pub fn create_test_file(dir: &Path, relative_path: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Catalog content with a header declaring `language` and the given entries
pub fn catalog_content(language: &str, entries: &[(&str, &str)]) -> String {
    let mut content = format!(
        "msgid \"\"\nmsgstr \"\"\n\"Language: {}\\n\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n",
        language
    );
    for (msgid, msgstr) in entries {
        content.push_str(&format!("\nmsgid \"{}\"\nmsgstr \"{}\"\n", msgid, msgstr));
    }
    content
}

/// Writes `<locales>/<language>/LC_MESSAGES/app.po`
pub fn write_catalog(locales_dir: &Path, language: &str, entries: &[(&str, &str)]) -> Result<PathBuf> {
    create_test_file(
        locales_dir,
        &format!("{}/LC_MESSAGES/app.po", language),
        &catalog_content(language, entries),
    )
}

/// Configuration rooted in `root`: `locale/`, `ignores/`, English sources
pub fn test_config(root: &Path) -> Config {
    Config {
        locales_dir: root.join("locale"),
        ignores_dir: root.join("ignores"),
        default_language: "en".to_string(),
        ..Config::default()
    }
}

/// Small in-memory dictionaries for English, German and French
pub fn memory_source() -> MemorySource {
    MemorySource::new()
        .with_language("en", ["hello", "world", "open", "file", "save", "the", "baz"])
        .with_language("de", ["Hallo", "Welt", "Datei", "öffnen", "speichern"])
        .with_language("fr", ["Bonjour", "monde", "fichier", "ouvrir"])
}

/// Controller over `config` backed by `memory_source`
pub fn test_controller(config: Config) -> Controller {
    Controller::new(config, Box::new(memory_source()))
}

/// Runs `controller` and returns its summary and console output
pub fn run_controller(controller: &Controller) -> Result<(RunSummary, String)> {
    let mut console = Vec::new();
    let summary = {
        let mut reporter = Reporter::new(&mut console);
        controller.run(&mut reporter)?
    };
    Ok((summary, String::from_utf8(console)?))
}

/// Routes library logs to the test harness
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
