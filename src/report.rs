/*!
 * Findings and where they go.
 *
 * Every finding is written to the console as
 * `ERROR: <relative path>:<line>: <word>`. When an output directory is set,
 * the same line is appended to `<output dir>/<language>_output.txt`, one file
 * per dictionary language.
 */

use indicatif::ProgressBar;
use log::debug;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Which side of an entry a finding was made in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSide {
    /// msgid / msgid_plural, checked against the default language
    Source,
    /// msgstr, checked against the catalog's language
    Translation,
}

/// A word rejected by a dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Catalog path relative to the locales directory
    pub file_path: PathBuf,
    pub line_number: usize,
    pub word: String,
    /// Language of the dictionary that rejected the word
    pub language: String,
    pub side: TextSide,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ERROR: {}:{}: {}",
            self.file_path.display(),
            self.line_number,
            self.word
        )
    }
}

/// Totals of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_checked: usize,
    pub files_failed: usize,
    pub source_findings: usize,
    pub translation_findings: usize,
    pub malformed_texts: usize,
}

impl RunSummary {
    pub fn total_findings(&self) -> usize {
        self.source_findings + self.translation_findings
    }

    pub fn has_findings(&self) -> bool {
        self.total_findings() > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} catalog(s) checked, {} failed, {} finding(s) ({} source, {} translation), {} malformed text(s) skipped",
            self.files_checked,
            self.files_failed,
            self.total_findings(),
            self.source_findings,
            self.translation_findings,
            self.malformed_texts
        )
    }
}

/// Writes findings to the console and, optionally, to per-language files
pub struct Reporter<'a> {
    console: Box<dyn Write + 'a>,
    output_dir: Option<PathBuf>,
    files: HashMap<String, File>,
    progress: Option<ProgressBar>,
}

impl<'a> Reporter<'a> {
    /// Reporter writing to `console` only
    pub fn new<W: Write + 'a>(console: W) -> Self {
        Self {
            console: Box::new(console),
            output_dir: None,
            files: HashMap::new(),
            progress: None,
        }
    }

    /// Reporter writing to stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Also append findings below `dir`; the directory must exist
    pub fn set_output_dir(&mut self, dir: Option<PathBuf>) {
        self.files.clear();
        self.output_dir = dir;
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Keep console lines from tearing a progress bar
    pub fn attach_progress(&mut self, progress: ProgressBar) {
        self.progress = Some(progress);
    }

    pub fn detach_progress(&mut self) {
        self.progress = None;
    }

    /// Path of the output file for `language`
    pub fn output_file_path(dir: &Path, language: &str) -> PathBuf {
        dir.join(format!("{}_output.txt", language))
    }

    /// Report one finding
    pub fn report(&mut self, finding: &Finding) -> Result<(), AppError> {
        let line = finding.to_string();

        match &self.progress {
            Some(progress) => {
                let console = &mut self.console;
                progress.suspend(|| writeln!(console, "{}", line))?;
            }
            None => writeln!(self.console, "{}", line)?,
        }

        if let Some(dir) = &self.output_dir {
            let file = match self.files.entry(finding.language.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let path = Self::output_file_path(dir, &finding.language);
                    debug!("Opening output file {:?}", path);
                    let file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&path)
                        .map_err(|e| {
                            AppError::Output(format!("Failed to open {:?}: {}", path, e))
                        })?;
                    entry.insert(file)
                }
            };
            writeln!(file, "{}", line).map_err(|e| {
                let language = &finding.language;
                AppError::Output(format!("Failed to append finding for '{}': {}", language, e))
            })?;
        }

        Ok(())
    }

    /// Flush the console and every open output file
    pub fn flush(&mut self) -> Result<(), AppError> {
        self.console.flush()?;
        for file in self.files.values_mut() {
            file.flush()?;
        }
        Ok(())
    }
}
