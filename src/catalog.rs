use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CatalogError;

// @module: Gettext catalog (.po) parsing

// @const: Charset declared in the Content-Type header
static CHARSET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)content-type:[^"\n]*charset\s*=\s*([A-Za-z0-9_.:-]+)"#)
        .expect("Invalid charset regex")
});

// @enum: A checkable text of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Id,
    IdPlural,
    // Position among the translations: 0 is msgstr / msgstr[0]
    Str(usize),
}

// @struct: Single catalog entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogEntry {
    // @field: msgctxt, never spell checked
    pub context: Option<String>,

    // @field: msgid
    pub source_text: String,

    // @field: msgid_plural
    pub source_plural: Option<String>,

    // @field: msgstr, or msgstr[0] for plural entries
    pub translated_text: String,

    // @field: msgstr[1..] for plural entries
    pub translated_plurals: Vec<String>,

    // @field: 1-based line of the msgid keyword
    pub line_number: usize,

    // @field: Entry is commented out with #~
    pub is_obsolete: bool,

    // @field: Entry carries the fuzzy flag
    pub is_fuzzy: bool,

    // @field: Texts with an escape sequence that could not be decoded
    pub malformed: Vec<TextField>,
}

impl CatalogEntry {
    /// Creates an entry - used by tests and external consumers
    pub fn new(line_number: usize, source_text: &str, translated_text: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            translated_text: translated_text.to_string(),
            line_number,
            ..Self::default()
        }
    }

    /// Texts in the source language
    pub fn source_texts(&self) -> impl Iterator<Item = (TextField, &str)> {
        std::iter::once((TextField::Id, self.source_text.as_str()))
            .chain(self.source_plural.as_deref().map(|p| (TextField::IdPlural, p)))
    }

    /// Texts in the target language
    pub fn translated_texts(&self) -> impl Iterator<Item = (TextField, &str)> {
        std::iter::once((TextField::Str(0), self.translated_text.as_str())).chain(
            self.translated_plurals
                .iter()
                .enumerate()
                .map(|(i, t)| (TextField::Str(i + 1), t.as_str())),
        )
    }

    pub fn is_malformed(&self, field: TextField) -> bool {
        self.malformed.contains(&field)
    }
}

/// A parsed catalog file
#[derive(Debug, Clone)]
pub struct Catalog {
    /// File the catalog was read from
    pub path: PathBuf,

    /// Entries in file order, header excluded
    pub entries: Vec<CatalogEntry>,

    /// Header fields (`Language`, `Content-Type`, ...)
    pub headers: Vec<(String, String)>,
}

// Which field continuation strings append to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Debug, Default)]
struct PendingEntry {
    context: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: BTreeMap<usize, String>,
    line_number: usize,
    obsolete: bool,
    fuzzy: bool,
    malformed: Vec<Field>,
}

impl PendingEntry {
    fn is_empty(&self) -> bool {
        self.context.is_none() && self.msgid.is_none() && self.msgstr.is_empty()
    }

    fn mark_malformed(&mut self, field: Field) {
        if !self.malformed.contains(&field) {
            self.malformed.push(field);
        }
    }
}

impl Catalog {
    /// Read and parse a catalog file
    ///
    /// The file is decoded with the charset its header declares, UTF-8 when
    /// none is declared. Bytes invalid in that charset are replaced with
    /// U+FFFD so a single damaged string does not make the whole file
    /// unreadable.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = decode(&bytes, path);
        Self::parse_str(path, &content)
    }

    /// Parse catalog content; `path` is only used for error messages
    pub fn parse_str(path: &Path, content: &str) -> Result<Self, CatalogError> {
        let mut catalog = Catalog {
            path: path.to_path_buf(),
            entries: Vec::new(),
            headers: Vec::new(),
        };
        let mut pending = PendingEntry::default();
        let mut field = Field::None;
        let mut saw_header = false;

        let syntax = |line: usize, reason: String| CatalogError::Syntax {
            path: path.to_path_buf(),
            line,
            reason,
        };

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            let mut line = raw_line.trim();

            if line.is_empty() {
                catalog.finish(&mut pending, &mut saw_header);
                field = Field::None;
                continue;
            }

            let mut obsolete = false;
            if let Some(rest) = line.strip_prefix("#~") {
                // Previous-msgid lines of obsolete entries carry nothing to check
                if rest.starts_with('|') {
                    continue;
                }
                obsolete = true;
                line = rest.trim_start();
                if line.is_empty() {
                    continue;
                }
            } else if line.starts_with('#') {
                // Comments belong to the next entry
                if pending.msgid.is_some() {
                    catalog.finish(&mut pending, &mut saw_header);
                    field = Field::None;
                }
                if let Some(flags) = line.strip_prefix("#,") {
                    pending.fuzzy |= flags.split(',').any(|f| f.trim() == "fuzzy");
                }
                continue;
            }

            if line.starts_with('"') {
                let (text, malformed) =
                    unquote(line).map_err(|reason| syntax(line_number, reason))?;
                if malformed {
                    debug!("{:?}:{}: undecodable escape sequence", path, line_number);
                    pending.mark_malformed(field);
                }
                match field {
                    Field::Context => {
                        pending.context.get_or_insert_with(String::new).push_str(&text)
                    }
                    Field::Id => pending.msgid.get_or_insert_with(String::new).push_str(&text),
                    Field::IdPlural => {
                        pending.msgid_plural.get_or_insert_with(String::new).push_str(&text)
                    }
                    Field::Str(n) => pending.msgstr.entry(n).or_default().push_str(&text),
                    Field::None => {
                        let reason = "string outside of any keyword".to_string();
                        return Err(syntax(line_number, reason));
                    }
                }
                continue;
            }

            let (keyword, value) = line
                .split_once(char::is_whitespace)
                .map(|(k, v)| (k, v.trim_start()))
                .ok_or_else(|| syntax(line_number, format!("unexpected line '{}'", line)))?;
            let (text, malformed) = unquote(value).map_err(|reason| syntax(line_number, reason))?;

            match keyword {
                "msgctxt" => {
                    if pending.msgid.is_some() {
                        catalog.finish(&mut pending, &mut saw_header);
                    }
                    pending.context = Some(text);
                    field = Field::Context;
                }
                "msgid" => {
                    if pending.msgid.is_some() {
                        catalog.finish(&mut pending, &mut saw_header);
                    }
                    pending.msgid = Some(text);
                    pending.line_number = line_number;
                    field = Field::Id;
                }
                "msgid_plural" => {
                    pending.msgid_plural = Some(text);
                    field = Field::IdPlural;
                }
                "msgstr" => {
                    pending.msgstr.insert(0, text);
                    field = Field::Str(0);
                }
                other => {
                    let index = other
                        .strip_prefix("msgstr[")
                        .and_then(|rest| rest.strip_suffix(']'))
                        .and_then(|n| n.parse::<usize>().ok())
                        .ok_or_else(|| {
                            syntax(line_number, format!("unknown keyword '{}'", other))
                        })?;
                    pending.msgstr.insert(index, text);
                    field = Field::Str(index);
                }
            }
            if malformed {
                debug!("{:?}:{}: undecodable escape sequence", path, line_number);
                pending.mark_malformed(field);
            }
            pending.obsolete |= obsolete;
        }

        catalog.finish(&mut pending, &mut saw_header);

        debug!(
            "Parsed {} entries from {:?} (language: {})",
            catalog.entries.len(),
            path,
            catalog.language().unwrap_or("unknown")
        );

        Ok(catalog)
    }

    // Move the pending entry into the catalog; the first entry with an empty
    // msgid and no context is the header
    fn finish(&mut self, pending: &mut PendingEntry, saw_header: &mut bool) {
        let entry = std::mem::take(pending);
        if entry.is_empty() {
            // Flags seen before a blank line stay with the next entry
            pending.fuzzy = entry.fuzzy;
            return;
        }
        let Some(msgid) = entry.msgid else {
            return;
        };

        let mut msgstr = entry.msgstr;
        let translated_text = msgstr.remove(&0).unwrap_or_default();

        // msgstr[n] keys may have gaps; translations are addressed by position
        let plural_keys: Vec<usize> = msgstr.keys().copied().collect();
        let malformed = entry
            .malformed
            .iter()
            .filter_map(|field| match *field {
                Field::Id => Some(TextField::Id),
                Field::IdPlural => Some(TextField::IdPlural),
                Field::Str(0) => Some(TextField::Str(0)),
                Field::Str(n) => plural_keys
                    .iter()
                    .position(|&k| k == n)
                    .map(|i| TextField::Str(i + 1)),
                Field::Context | Field::None => None,
            })
            .collect();

        if msgid.is_empty() && entry.context.is_none() && !entry.obsolete && !*saw_header {
            *saw_header = true;
            self.headers = parse_headers(&translated_text);
            return;
        }

        self.entries.push(CatalogEntry {
            context: entry.context,
            source_text: msgid,
            source_plural: entry.msgid_plural,
            translated_text,
            translated_plurals: msgstr.into_values().collect(),
            line_number: entry.line_number,
            is_obsolete: entry.obsolete,
            is_fuzzy: entry.fuzzy,
            malformed,
        });
    }

    /// Look up a header field, case-insensitively
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// The declared target language
    pub fn language(&self) -> Option<&str> {
        self.header("Language")
    }

    /// Entries that take part in checking
    pub fn active_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| !e.is_obsolete)
    }
}

fn parse_headers(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

// Decode with the declared charset, falling back to UTF-8
fn decode<'a>(bytes: &'a [u8], path: &Path) -> Cow<'a, str> {
    let declared = CHARSET_REGEX
        .captures(bytes)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_bytes());

    let encoding = match declared {
        Some(label) => Encoding::for_label(label).unwrap_or_else(|| {
            warn!(
                "{:?}: unknown charset '{}', reading as UTF-8",
                path,
                String::from_utf8_lossy(label)
            );
            UTF_8
        }),
        None => UTF_8,
    };

    let (content, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("{:?}: bytes invalid in {} were replaced", path, used.name());
    }
    content
}

// Strip the quotes of a PO string and resolve its escapes
//
// The flag is set when an escape cannot be decoded: unknown escapes, a
// trailing backslash, or octal/hex escapes outside ASCII. Those escapes are
// kept as written.
fn unquote(value: &str) -> Result<(String, bool), String> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|_| value.len() >= 2)
        .ok_or_else(|| format!("unterminated string {}", value))?;

    let mut out = String::with_capacity(inner.len());
    let mut malformed = false;
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            malformed = true;
            out.push('\\');
            break;
        };

        let decoded = match escape {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'v' => Some('\u{0B}'),
            '\\' | '"' | '\'' | '?' => Some(escape),
            '0'..='7' => {
                let mut digits = String::from(escape);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(&d @ '0'..='7') => {
                            digits.push(d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                ascii_from_radix(&digits, 8)
            }
            'x' => {
                let mut digits = String::new();
                while digits.len() < 2 {
                    match chars.peek() {
                        Some(&d) if d.is_ascii_hexdigit() => {
                            digits.push(d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                ascii_from_radix(&digits, 16)
            }
            _ => None,
        };

        match decoded {
            Some(ch) => out.push(ch),
            None => {
                malformed = true;
                out.push('\\');
                out.push(escape);
            }
        }
    }

    Ok((out, malformed))
}

fn ascii_from_radix(digits: &str, radix: u32) -> Option<char> {
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .filter(char::is_ascii)
}
