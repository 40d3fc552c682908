/*!
 * Startup-time registry of chunker and filter factories.
 *
 * Configuration names chunkers and filters by identifier. Built-in
 * identifiers are matched case-insensitively; dotted identifiers
 * (`mycrate.MyFilter`) name external implementations, which must be
 * registered with `register_chunker` / `register_filter` before the
 * pipeline is built.
 */

use log::{debug, info};
use std::collections::HashMap;

use super::chunkers::{Chunker, HtmlChunker, PhraseChunker, WordChunker};
use super::filters::{EdgecaseFilter, Filter, IdentifierFilter, PlaceholderFilter, UrlFilter};
use super::validator::Pipeline;
use crate::app_config::Config;
use crate::errors::ConfigError;

/// Builds a chunker instance
pub type ChunkerFactory = Box<dyn Fn() -> Box<dyn Chunker> + Send + Sync>;

/// Builds a filter instance
pub type FilterFactory = Box<dyn Fn() -> Box<dyn Filter> + Send + Sync>;

/// Identifier -> factory mapping
pub struct Registry {
    chunkers: HashMap<String, ChunkerFactory>,
    filters: HashMap<String, FilterFactory>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl Registry {
    /// A registry with nothing registered
    pub fn empty() -> Self {
        Self {
            chunkers: HashMap::new(),
            filters: HashMap::new(),
        }
    }

    /// A registry holding the built-in chunkers and filters
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();

        for name in ["words", "WordChunker", "word", "text"] {
            registry.register_chunker(name, || Box::new(WordChunker));
        }
        for name in ["html", "HTMLChunker", "markup"] {
            registry.register_chunker(name, || Box::new(HtmlChunker));
        }

        for name in ["placeholders", "PlaceholderFilter", "PythonFormatFilter", "format"] {
            registry.register_filter(name, || Box::new(PlaceholderFilter));
        }
        for name in ["urls", "URLFilter", "EmailFilter", "url", "email"] {
            registry.register_filter(name, || Box::new(UrlFilter));
        }
        for name in ["identifiers", "IdentifierFilter", "WikiWordFilter", "code"] {
            registry.register_filter(name, || Box::new(IdentifierFilter));
        }

        registry
    }

    // Built-in names are case-insensitive, dotted names are not
    fn key(name: &str) -> String {
        let name = name.trim();
        if name.contains('.') {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    pub fn register_chunker<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Chunker> + Send + Sync + 'static,
    {
        self.chunkers.insert(Self::key(name), Box::new(factory));
    }

    pub fn register_filter<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Filter> + Send + Sync + 'static,
    {
        self.filters.insert(Self::key(name), Box::new(factory));
    }

    pub fn chunker(&self, name: &str) -> Result<Box<dyn Chunker>, ConfigError> {
        self.chunkers
            .get(&Self::key(name))
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownChunker(name.trim().to_string()))
    }

    pub fn filter(&self, name: &str) -> Result<Box<dyn Filter>, ConfigError> {
        self.filters
            .get(&Self::key(name))
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownFilter(name.trim().to_string()))
    }

    /// Build the pipeline described by `config`
    ///
    /// Configured phrases add one `PhraseChunker`, configured edge-case words
    /// add one `EdgecaseFilter`.
    pub fn build_pipeline(&self, config: &Config) -> Result<Pipeline, ConfigError> {
        let mut pipeline = Pipeline::new();

        for name in config.effective_chunkers() {
            pipeline = pipeline.with_chunker(self.chunker(&name)?);
        }
        for name in &config.filters {
            pipeline = pipeline.with_filter(self.filter(name)?);
        }

        if let Some(phrases) = &config.phrases {
            debug!("Adding phrase chunker with {} phrase(s)", phrases.len());
            pipeline = pipeline.with_chunker(Box::new(PhraseChunker::new(phrases)));
        }
        if let Some(words) = &config.edgecase_words {
            debug!("Adding edge-case filter with {} word(s)", words.len());
            pipeline = pipeline.with_filter(Box::new(EdgecaseFilter::new(words)));
        }

        info!(
            "Chunkers: [{}], filters: [{}]",
            pipeline.chunker_names().join(", "),
            pipeline.filter_names().join(", ")
        );

        Ok(pipeline)
    }
}
