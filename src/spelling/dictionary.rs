/*!
 * Dictionary adapter.
 *
 * A `Dictionary` answers one question: is this word known in a language?
 * It combines a base `Lexicon` (a Hunspell dictionary in production) with the
 * allow list read from the language's ignore file.
 */

use log::debug;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::DictionaryError;
use crate::language_utils::Locale;

/// Opaque word-knowledge capability
pub trait Lexicon: Send + Sync {
    /// Whether `word` is spelled correctly
    fn knows(&self, word: &str) -> bool;
}

impl Lexicon for spellbook::Dictionary {
    fn knows(&self, word: &str) -> bool {
        self.check(word)
    }
}

/// In-memory lexicon
///
/// Like Hunspell, a lowercase entry also accepts its capitalized and
/// all-caps forms.
#[derive(Debug, Default, Clone)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { words: words.into_iter().map(Into::into).collect() }
    }
}

impl Lexicon for WordSet {
    fn knows(&self, word: &str) -> bool {
        contains_word(&self.words, word)
    }
}

// Exact match, or a capitalized / all-caps word whose lowercase form is listed
fn contains_word(words: &HashSet<String>, word: &str) -> bool {
    if words.contains(word) {
        return true;
    }

    let mut chars = word.chars();
    let capitalized = chars.next().is_some_and(char::is_uppercase)
        && (chars.clone().all(|c| !c.is_uppercase()) || chars.all(|c| !c.is_lowercase()));
    capitalized && words.contains(&word.to_lowercase())
}

/// Loads the base lexicon of a language
pub trait LexiconSource: Send + Sync {
    fn load(&self, language: &str) -> Result<Box<dyn Lexicon>, DictionaryError>;
}

/// Reads Hunspell `<language>.aff` / `<language>.dic` pairs from a directory
///
/// `pt_BR` falls back to `pt` when no regional dictionary exists.
#[derive(Debug, Clone)]
pub struct HunspellSource {
    dir: PathBuf,
}

impl HunspellSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn read(path: &Path) -> Result<String, DictionaryError> {
        fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl LexiconSource for HunspellSource {
    fn load(&self, language: &str) -> Result<Box<dyn Lexicon>, DictionaryError> {
        for stem in lookup_stems(language) {
            let aff_path = self.dir.join(format!("{}.aff", stem));
            let dic_path = self.dir.join(format!("{}.dic", stem));
            if !aff_path.is_file() || !dic_path.is_file() {
                continue;
            }

            debug!("Loading dictionary {:?}", dic_path);
            let aff = Self::read(&aff_path)?;
            let dic = Self::read(&dic_path)?;
            let dictionary = spellbook::Dictionary::new(&aff, &dic).map_err(|e| {
                DictionaryError::Parse { language: language.to_string(), reason: e.to_string() }
            })?;
            return Ok(Box::new(dictionary));
        }

        Err(DictionaryError::NotFound {
            language: language.to_string(),
            searched: self.dir.clone(),
        })
    }
}

/// Lexicons held in memory, keyed by language tag
///
/// Useful for embedding the checker without Hunspell files on disk.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    languages: HashMap<String, WordSet>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the words known for `language`
    pub fn with_language<I, S>(mut self, language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages.insert(language.to_string(), WordSet::new(words));
        self
    }
}

impl LexiconSource for MemorySource {
    fn load(&self, language: &str) -> Result<Box<dyn Lexicon>, DictionaryError> {
        lookup_stems(language)
            .iter()
            .find_map(|stem| self.languages.get(stem))
            .map(|set| Box::new(set.clone()) as Box<dyn Lexicon>)
            .ok_or_else(|| DictionaryError::NotFound {
                language: language.to_string(),
                searched: PathBuf::from("<memory>"),
            })
    }
}

// File stems to try for a language, most specific first
fn lookup_stems(language: &str) -> Vec<String> {
    match Locale::parse(language) {
        Ok(locale) => locale.lookup_candidates(),
        Err(_) => vec![language.trim().to_string()],
    }
}

/// Path of the ignore file used for `language`
///
/// The most specific existing `<stem>.txt` wins; when none exists the path
/// of the most specific candidate is returned.
pub fn ignore_file_path(ignores_dir: &Path, language: &str) -> PathBuf {
    let stems = lookup_stems(language);
    stems
        .iter()
        .map(|stem| ignores_dir.join(format!("{}.txt", stem)))
        .find(|path| path.is_file())
        .unwrap_or_else(|| ignores_dir.join(format!("{}.txt", stems[0])))
}

/// Read an ignore file: one word per line, `#` starts a comment line
///
/// A missing file is an empty allow list.
pub fn read_ignore_file(path: &Path) -> Result<HashSet<String>, DictionaryError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No ignore file at {:?}", path);
            return Ok(HashSet::new());
        }
        Err(source) => {
            return Err(DictionaryError::IgnoreFile { path: path.to_path_buf(), source });
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// A language dictionary augmented with an allow list
pub struct Dictionary {
    language: String,
    allow_list: HashSet<String>,
    base: Box<dyn Lexicon>,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("language", &self.language)
            .field("allow_list", &self.allow_list.len())
            .finish_non_exhaustive()
    }
}

impl Dictionary {
    pub fn new(language: &str, base: Box<dyn Lexicon>, allow_list: HashSet<String>) -> Self {
        Self {
            language: language.to_string(),
            allow_list,
            base,
        }
    }

    /// Load the base lexicon for `language` and the matching ignore file
    pub fn open(
        language: &str,
        source: &dyn LexiconSource,
        ignores_dir: &Path,
    ) -> Result<Self, DictionaryError> {
        let base = source.load(language)?;
        let ignore_file = ignore_file_path(ignores_dir, language);
        let allow_list = read_ignore_file(&ignore_file)?;

        debug!(
            "Dictionary '{}' ready with {} ignored words from {:?}",
            language,
            allow_list.len(),
            ignore_file
        );

        Ok(Self::new(language, base, allow_list))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn allow_list(&self) -> &HashSet<String> {
        &self.allow_list
    }

    /// Whether `word` is allowed or known to the base lexicon
    ///
    /// A capitalized or all-caps word also matches its lowercase allow-list
    /// entry.
    pub fn knows(&self, word: &str) -> bool {
        self.is_allowed(word) || self.base.knows(word)
    }

    fn is_allowed(&self, word: &str) -> bool {
        contains_word(&self.allow_list, word)
    }
}
