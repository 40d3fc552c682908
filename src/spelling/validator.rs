/*!
 * Entry validation: chunk, filter, look up.
 */

use log::trace;

use super::chunkers::{Chunker, Token, TokenKind};
use super::dictionary::Dictionary;
use super::filters::{Filter, FilterContext};
use crate::errors::CheckError;

/// The configured chunkers and filters of a run
///
/// Built once and shared read-only by every catalog check.
#[derive(Default)]
pub struct Pipeline {
    chunkers: Vec<Box<dyn Chunker>>,
    filters: Vec<Box<dyn Filter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunker(mut self, chunker: Box<dyn Chunker>) -> Self {
        self.chunkers.push(chunker);
        self
    }

    pub fn with_filter(mut self, filter: Box<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn chunker_names(&self) -> Vec<&str> {
        self.chunkers.iter().map(|c| c.name()).collect()
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run every chunker over `text` and merge the results
    ///
    /// Identical tokens (same text and span) collapse into one, and word
    /// tokens inside a phrase token are dropped. The result is ordered by
    /// position, longer tokens first on ties.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut tokens: Vec<Token> = Vec::new();
        for chunker in &self.chunkers {
            for token in chunker.chunk(text) {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
        }

        let phrase_spans: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Phrase)
            .map(|t| t.span.clone())
            .collect();
        tokens.retain(|t| {
            t.kind == TokenKind::Phrase || !phrase_spans.iter().any(|span| t.is_within(span))
        });

        tokens.sort_by(|a, b| {
            a.span
                .start
                .cmp(&b.span.start)
                .then_with(|| b.span.end.cmp(&a.span.end))
        });
        tokens
    }

    /// Whether every filter accepts `token`
    pub fn accepts(&self, token: &Token, context: &FilterContext<'_>) -> bool {
        self.filters.iter().all(|f| f.accept(token, context))
    }
}

/// Checks texts against one dictionary
pub struct EntryValidator<'a> {
    pipeline: &'a Pipeline,
    dictionary: &'a Dictionary,
}

impl<'a> EntryValidator<'a> {
    pub fn new(pipeline: &'a Pipeline, dictionary: &'a Dictionary) -> Self {
        Self { pipeline, dictionary }
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.dictionary
    }

    /// Return the unknown tokens of `text`, one per occurrence
    ///
    /// Phrase tokens are configured vocabulary and are never looked up.
    pub fn validate(&self, text: &str) -> Result<Vec<Token>, CheckError> {
        if text.contains(char::REPLACEMENT_CHARACTER) {
            return Err(CheckError::MalformedText(
                "text contains bytes that are not valid UTF-8".to_string(),
            ));
        }

        let context = FilterContext::new(text);
        let unknown: Vec<Token> = self
            .pipeline
            .tokenize(text)
            .into_iter()
            .filter(|token| token.kind == TokenKind::Word)
            .filter(|token| self.pipeline.accepts(token, &context))
            .filter(|token| !self.dictionary.knows(&token.text))
            .collect();

        if !unknown.is_empty() {
            trace!(
                "{} unknown word(s) for '{}' in {:?}",
                unknown.len(),
                self.dictionary.language(),
                text
            );
        }

        Ok(unknown)
    }
}
