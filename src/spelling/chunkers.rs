/*!
 * Chunkers split a text into the tokens that get spell checked.
 *
 * Every chunker sees the whole text and reports byte spans into it, so the
 * outputs of several chunkers can be merged afterwards (see
 * `validator::Pipeline::tokenize`).
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Regex for markup tags and character entities
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^<>]*>|&(?:#\d+|#x[0-9A-Fa-f]+|\w+);").expect("Invalid markup regex")
});

/// Regex for a single combining mark (general category M)
static MARK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{M}$").expect("Invalid combining mark regex"));

/// What produced a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A single word
    Word,
    /// A configured phrase matched verbatim
    Phrase,
}

/// A candidate word with its position in the source text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The candidate text
    pub text: String,
    /// Byte range in the chunked text
    pub span: Range<usize>,
    /// Origin of the token
    pub kind: TokenKind,
}

impl Token {
    /// Create a word token
    pub fn word(text: &str, span: Range<usize>) -> Self {
        Self { text: text.to_string(), span, kind: TokenKind::Word }
    }

    /// Create a phrase token
    pub fn phrase(text: &str, span: Range<usize>) -> Self {
        Self { text: text.to_string(), span, kind: TokenKind::Phrase }
    }

    /// Whether this token's span lies within `outer`
    pub fn is_within(&self, outer: &Range<usize>) -> bool {
        outer.start <= self.span.start && self.span.end <= outer.end
    }
}

/// Splits a text into candidate tokens
///
/// Implementations must be deterministic and free of side effects; the same
/// instance is shared by every catalog of a run.
pub trait Chunker: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Produce the tokens of `text`, in text order
    fn chunk(&self, text: &str) -> Vec<Token>;
}

/// Letters and the combining marks of decomposed text (`e` + U+0301)
pub(crate) fn is_letter(c: char) -> bool {
    c.is_alphabetic() || (!c.is_ascii() && is_combining_mark(c))
}

fn is_combining_mark(c: char) -> bool {
    let mut buf = [0u8; 4];
    MARK_REGEX.is_match(c.encode_utf8(&mut buf))
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Byte ranges of the letter runs in `text`
///
/// An apostrophe between two letters stays inside the word (`don't`).
pub(crate) fn word_spans(text: &str) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if is_letter(c) {
            start.get_or_insert(offset);
            continue;
        }

        let joins_word = is_apostrophe(c)
            && start.is_some()
            && chars.get(i + 1).is_some_and(|&(_, next)| is_letter(next));
        if joins_word {
            continue;
        }

        if let Some(s) = start.take() {
            spans.push(s..offset);
        }
    }

    if let Some(s) = start {
        spans.push(s..text.len());
    }

    spans
}

/// Default chunker: one token per run of letters
#[derive(Debug, Default, Clone)]
pub struct WordChunker;

impl Chunker for WordChunker {
    fn name(&self) -> &str {
        "words"
    }

    fn chunk(&self, text: &str) -> Vec<Token> {
        word_spans(text)
            .into_iter()
            .map(|span| Token::word(&text[span.clone()], span))
            .collect()
    }
}

/// Word chunker that skips markup tags and character entities
#[derive(Debug, Default, Clone)]
pub struct HtmlChunker;

impl Chunker for HtmlChunker {
    fn name(&self) -> &str {
        "html"
    }

    fn chunk(&self, text: &str) -> Vec<Token> {
        // Blank out markup byte-for-byte so spans still index into `text`
        let mut masked = String::with_capacity(text.len());
        let mut last = 0;
        for m in MARKUP_REGEX.find_iter(text) {
            masked.push_str(&text[last..m.start()]);
            masked.extend(std::iter::repeat_n(' ', m.len()));
            last = m.end();
        }
        masked.push_str(&text[last..]);

        word_spans(&masked)
            .into_iter()
            .map(|span| Token::word(&text[span.clone()], span))
            .collect()
    }
}

/// Emits configured phrases as single tokens
///
/// Phrases match literally and case-sensitively, and only on word
/// boundaries. The scan runs left to right; at each position the longest
/// phrase wins and a match consumes its span, so matches never overlap.
#[derive(Debug, Clone)]
pub struct PhraseChunker {
    // Longest first
    phrases: Vec<String>,
}

impl PhraseChunker {
    /// Build a chunker from a phrase list; blank entries are ignored
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();

        Self { phrases }
    }

    /// Configured phrases, longest first
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    fn starts_word(text: &str, pos: usize) -> bool {
        text[..pos].chars().next_back().is_none_or(|c| !is_letter(c))
    }

    fn ends_word(text: &str, pos: usize) -> bool {
        text[pos..].chars().next().is_none_or(|c| !is_letter(c))
    }
}

impl Chunker for PhraseChunker {
    fn name(&self) -> &str {
        "phrases"
    }

    fn chunk(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            if Self::starts_word(text, pos) {
                let rest = &text[pos..];
                let matched = self
                    .phrases
                    .iter()
                    .find(|p| rest.starts_with(p.as_str()) && Self::ends_word(text, pos + p.len()));

                if let Some(phrase) = matched {
                    let end = pos + phrase.len();
                    tokens.push(Token::phrase(phrase, pos..end));
                    pos = end;
                    continue;
                }
            }
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }

        tokens
    }
}
