/*!
 * Filters decide which tokens reach the dictionary.
 *
 * A filter is a pure predicate over a token and the text it came from.
 * Filters are combined with logical AND: a token must be accepted by every
 * filter to be looked up. Anything a filter does not recognize is accepted,
 * so an unknown shape ends up flagged rather than silently passing.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::chunkers::Token;

/// Regex for format placeholders (printf, python, brace, shell and Qt styles)
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"%\([^)\s]+\)[-+ #0]*\d*(?:\.\d+)?[diouxXeEfFgGcrsa%]",
        r"|%(?:\d+\$)?[-+ #0]*(?:\d+|\*)?(?:\.(?:\d+|\*))?(?:hh|h|ll|l|L|q|j|z|t)?[diouxXeEfFgGaAcspn@]",
        r"|%L?\d+",
        r"|\{\{[^{}]*\}\}",
        r"|\{[^{}\s]*\}",
        r"|\$\{[A-Za-z_][\w.]*\}",
        r"|\$[A-Za-z_]\w*",
    ))
    .expect("Invalid placeholder regex")
});

/// Regex for URLs and e-mail addresses
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?i)\b(?:[a-z][a-z0-9+.\-]*://|www\.|mailto:)[^\s<>"'()]+"#,
        r"|[\w.+\-]+@[\w\-]+(?:\.[\w\-]+)+",
    ))
    .expect("Invalid URL regex")
});

/// Regex for code identifiers, file names and paths
static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        // snake_case and leading underscores
        r"\b_*[A-Za-z0-9]+(?:_+[A-Za-z0-9]+)+\b|\b_\w+",
        // camelCase and PascalCase with an inner capital
        r"|\b[a-z]+[A-Z][A-Za-z0-9]*\b|\b[A-Z][a-z0-9]+[A-Z][A-Za-z0-9]*\b",
        // dotted names and file names
        r"|\b[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)+\b",
        // letters mixed with digits
        r"|\b[A-Za-z]+\d\w*\b|\b\d+[A-Za-z]\w*\b",
        // paths
        r"|(?:~|\.{1,2})?(?:/[\w.\-]+){2,}/?",
    ))
    .expect("Invalid identifier regex")
});

/// What a filter knows about the token's surroundings
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// The full text the token was cut from
    pub text: &'a str,
}

impl<'a> FilterContext<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    // Whether the token sits inside any match of `regex` in the text
    fn covered_by(&self, regex: &Regex, token: &Token) -> bool {
        regex
            .find_iter(self.text)
            .any(|m| token.is_within(&m.range()))
    }
}

/// Decides whether a token is spell checked
pub trait Filter: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Return false to drop the token
    fn accept(&self, token: &Token, context: &FilterContext<'_>) -> bool;
}

/// Drops tokens that are part of a formatting placeholder
#[derive(Debug, Default, Clone)]
pub struct PlaceholderFilter;

impl Filter for PlaceholderFilter {
    fn name(&self) -> &str {
        "placeholders"
    }

    fn accept(&self, token: &Token, context: &FilterContext<'_>) -> bool {
        !context.covered_by(&PLACEHOLDER_REGEX, token)
    }
}

/// Drops tokens that are part of a URL or an e-mail address
#[derive(Debug, Default, Clone)]
pub struct UrlFilter;

impl Filter for UrlFilter {
    fn name(&self) -> &str {
        "urls"
    }

    fn accept(&self, token: &Token, context: &FilterContext<'_>) -> bool {
        !context.covered_by(&URL_REGEX, token)
    }
}

/// Drops tokens that are part of something shaped like code
#[derive(Debug, Default, Clone)]
pub struct IdentifierFilter;

impl Filter for IdentifierFilter {
    fn name(&self) -> &str {
        "identifiers"
    }

    fn accept(&self, token: &Token, context: &FilterContext<'_>) -> bool {
        !context.covered_by(&IDENTIFIER_REGEX, token)
    }
}

/// Drops tokens that exactly match a configured word
///
/// Unlike the ignore files, this list lives in the project configuration and
/// applies to every language.
#[derive(Debug, Clone)]
pub struct EdgecaseFilter {
    words: HashSet<String>,
}

impl EdgecaseFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Filter for EdgecaseFilter {
    fn name(&self) -> &str {
        "edgecase_words"
    }

    fn accept(&self, token: &Token, _context: &FilterContext<'_>) -> bool {
        !self.words.contains(&token.text)
    }
}
