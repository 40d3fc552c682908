use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::check::CatalogCheck;
use crate::errors::{AppError, ConfigError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::report::{Reporter, RunSummary};
use crate::spelling::{Dictionary, HunspellSource, LexiconSource, Registry};

// @module: Application controller for catalog spell checking

/// Main application controller: one run over every catalog under `locales_dir`
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Where base dictionaries come from
    lexicon_source: Box<dyn LexiconSource>,

    // @field: Chunker and filter factories
    registry: Registry,

    // @field: Draw a progress bar over catalog files
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller with an explicit dictionary source
    pub fn new(config: Config, lexicon_source: Box<dyn LexiconSource>) -> Self {
        Self {
            config,
            lexicon_source,
            registry: Registry::with_builtins(),
            show_progress: false,
        }
    }

    // @method: Create a controller reading Hunspell files from `dictionaries_dir`
    pub fn with_config(config: Config) -> Self {
        let source = HunspellSource::new(config.dictionaries_dir.clone());
        Self::new(config, Box::new(source))
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Register external chunkers and filters here before calling `run`
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All catalog files under `locales_dir`, sorted
    pub fn discover_catalogs(&self) -> Result<Vec<PathBuf>, AppError> {
        let locales_dir = &self.config.locales_dir;
        if !FileManager::dir_exists(locales_dir) {
            return Err(AppError::File(format!(
                "Locales directory does not exist: {:?}",
                locales_dir
            )));
        }

        FileManager::find_files(locales_dir, "po").map_err(|e| AppError::File(format!("{:#}", e)))
    }

    /// Run the whole workflow
    ///
    /// Configuration and source dictionary failures abort the run. A catalog
    /// that cannot be parsed, or whose dictionary cannot be loaded, is logged
    /// and counted as failed.
    pub fn run(&self, reporter: &mut Reporter<'_>) -> Result<RunSummary, AppError> {
        let start_time = Instant::now();

        self.config.validate()?;
        let pipeline = self.registry.build_pipeline(&self.config)?;

        if let Some(build_dir) = &self.config.build_dir {
            FileManager::recreate_dir(build_dir).map_err(|e| AppError::Output(format!("{:#}", e)))?;
            reporter.set_output_dir(Some(build_dir.clone()));
        }

        let source_language = language_utils::normalize_locale(&self.config.default_language)
            .map_err(|_| ConfigError::InvalidLanguage {
                option: "default_language",
                code: self.config.default_language.clone(),
            })?;
        let source_dictionary = Dictionary::open(
            &source_language,
            self.lexicon_source.as_ref(),
            &self.config.ignores_dir,
        )?;
        debug!("Source dictionary: {:?}", source_dictionary);

        let catalogs = self.discover_catalogs()?;
        if catalogs.is_empty() {
            warn!("No catalog files found in {:?}", self.config.locales_dir);
        }

        let progress = self.progress_bar(catalogs.len());
        if let Some(pb) = &progress {
            reporter.attach_progress(pb.clone());
        }

        let mut summary = RunSummary::default();
        for path in &catalogs {
            let display_name = path
                .strip_prefix(&self.config.locales_dir)
                .unwrap_or(path)
                .display()
                .to_string();
            if let Some(pb) = &progress {
                pb.set_message(display_name.clone());
            }

            let check = CatalogCheck::open(
                path,
                &self.config.locales_dir,
                &self.config.ignores_dir,
                self.lexicon_source.as_ref(),
            );
            match check {
                Ok(mut check) => {
                    let outcome = check.run(&pipeline, &source_dictionary, reporter)?;
                    summary.files_checked += 1;
                    summary.source_findings += outcome.source_findings;
                    summary.translation_findings += outcome.translation_findings;
                    summary.malformed_texts += outcome.malformed_texts;
                }
                Err(e) => {
                    error!("Error checking {}: {}", display_name, e);
                    summary.files_failed += 1;
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            reporter.detach_progress();
            pb.finish_and_clear();
        }
        reporter.flush()?;

        info!("{} in {}", summary, Self::format_duration(start_time.elapsed()));
        Ok(summary)
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.show_progress || total == 0 {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} catalogs ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style.progress_chars("█▓▒░"));
        Some(pb)
    }

    /// Format a duration in a human-readable form
    fn format_duration(duration: Duration) -> String {
        let seconds = duration.as_secs();
        if seconds >= 60 {
            format!("{}m {}s", seconds / 60, seconds % 60)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
