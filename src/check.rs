/*!
 * Per-file spell check.
 *
 * A `CatalogCheck` owns one parsed catalog and the dictionary of the
 * catalog's language. Source texts are checked against the shared source
 * dictionary, translated texts against the catalog's own.
 */

use log::{debug, info, warn};
use std::path::{Component, Path, PathBuf};

use crate::catalog::{Catalog, CatalogEntry, TextField};
use crate::errors::{AppError, CatalogCheckError, CatalogError, CheckError, DictionaryError};
use crate::language_utils::{get_language_name, normalize_locale};
use crate::report::{Finding, Reporter, TextSide};
use crate::spelling::{Dictionary, EntryValidator, LexiconSource, Pipeline};

/// Lifecycle of a catalog check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Catalog parsed, no dictionary yet
    Constructed,
    /// Ready to run
    DictionaryInitialized,
    /// Entries are being checked
    Iterating,
    /// Every entry was checked; running again is allowed
    Complete,
}

/// Counters of one check run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub entries_checked: usize,
    pub source_findings: usize,
    pub translation_findings: usize,
    pub malformed_texts: usize,
}

impl CheckOutcome {
    pub fn findings(&self) -> usize {
        self.source_findings + self.translation_findings
    }
}

/// Spell check of a single catalog file
#[derive(Debug)]
pub struct CatalogCheck {
    catalog: Catalog,
    relative_path: PathBuf,
    language: String,
    dictionary: Option<Dictionary>,
    state: CheckState,
}

impl CatalogCheck {
    /// Parse `path`, resolve its language and load the target dictionary
    pub fn open(
        path: &Path,
        locales_dir: &Path,
        ignores_dir: &Path,
        source: &dyn LexiconSource,
    ) -> Result<Self, CatalogCheckError> {
        let catalog = Catalog::from_file(path)?;
        let relative_path = path.strip_prefix(locales_dir).unwrap_or(path).to_path_buf();

        let mut check = Self::new(catalog, relative_path)?;
        check.load_dictionary(source, ignores_dir)?;
        Ok(check)
    }

    /// Wrap an already parsed catalog
    ///
    /// `relative_path` is what findings report; it also serves as the
    /// language fallback when the header has no `Language:` field.
    pub fn new(catalog: Catalog, relative_path: PathBuf) -> Result<Self, CatalogError> {
        let language = resolve_language(&catalog, &relative_path)?;
        debug!("Catalog {:?} is in '{}'", relative_path, language);

        Ok(Self {
            catalog,
            relative_path,
            language,
            dictionary: None,
            state: CheckState::Constructed,
        })
    }

    /// Load the dictionary and ignore file of the catalog's language
    pub fn load_dictionary(
        &mut self,
        source: &dyn LexiconSource,
        ignores_dir: &Path,
    ) -> Result<(), DictionaryError> {
        let dictionary = Dictionary::open(&self.language, source, ignores_dir)?;
        self.set_dictionary(dictionary);
        Ok(())
    }

    /// Use an already built dictionary
    pub fn set_dictionary(&mut self, dictionary: Dictionary) {
        self.dictionary = Some(dictionary);
        self.state = CheckState::DictionaryInitialized;
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Check every non-obsolete entry and report findings
    pub fn run(
        &mut self,
        pipeline: &Pipeline,
        source_dictionary: &Dictionary,
        reporter: &mut Reporter<'_>,
    ) -> Result<CheckOutcome, AppError> {
        let Some(target_dictionary) = self.dictionary.as_ref() else {
            return Err(CatalogCheckError::DictionaryNotLoaded(self.relative_path.clone()).into());
        };

        self.state = CheckState::Iterating;
        let language_name =
            get_language_name(&self.language).unwrap_or_else(|_| self.language.clone());
        info!("Checking {:?} ({})", self.relative_path, language_name);

        let source = EntryValidator::new(pipeline, source_dictionary);
        let target = EntryValidator::new(pipeline, target_dictionary);
        let mut outcome = CheckOutcome::default();

        for entry in self.catalog.active_entries() {
            let texts = entry
                .source_texts()
                .map(|(field, text)| (field, text, &source, TextSide::Source))
                .chain(
                    entry
                        .translated_texts()
                        .map(|(field, text)| (field, text, &target, TextSide::Translation)),
                );
            for (field, text, validator, side) in texts {
                let checked = CheckedText { entry, field, text, side };
                check_text(&self.relative_path, &checked, validator, reporter, &mut outcome)?;
            }
            outcome.entries_checked += 1;
        }

        self.state = CheckState::Complete;
        debug!(
            "{:?}: {} entries, {} finding(s), {} malformed",
            self.relative_path,
            outcome.entries_checked,
            outcome.findings(),
            outcome.malformed_texts
        );

        Ok(outcome)
    }
}

struct CheckedText<'a> {
    entry: &'a CatalogEntry,
    field: TextField,
    text: &'a str,
    side: TextSide,
}

fn check_text(
    relative_path: &Path,
    checked: &CheckedText<'_>,
    validator: &EntryValidator<'_>,
    reporter: &mut Reporter<'_>,
    outcome: &mut CheckOutcome,
) -> Result<(), AppError> {
    let line_number = checked.entry.line_number;
    let result = if checked.entry.is_malformed(checked.field) {
        Err(CheckError::MalformedText(
            "text contains an undecodable escape sequence".to_string(),
        ))
    } else {
        validator.validate(checked.text)
    };

    let unknown = match result {
        Ok(unknown) => unknown,
        Err(e) => {
            warn!("{}:{}: skipping text: {}", relative_path.display(), line_number, e);
            outcome.malformed_texts += 1;
            return Ok(());
        }
    };

    let side = checked.side;
    for token in unknown {
        reporter.report(&Finding {
            file_path: relative_path.to_path_buf(),
            line_number,
            word: token.text,
            language: validator.dictionary().language().to_string(),
            side,
        })?;
        match side {
            TextSide::Source => outcome.source_findings += 1,
            TextSide::Translation => outcome.translation_findings += 1,
        }
    }

    Ok(())
}

/// Language of a catalog: the `Language:` header, else the path
///
/// Path fallback looks at the directories of `relative_path` nearest first
/// (`de/LC_MESSAGES/app.po` -> `de`), then at the file stem (`pt_BR.po`).
pub fn resolve_language(catalog: &Catalog, relative_path: &Path) -> Result<String, CatalogError> {
    if let Some(declared) = catalog.language() {
        match normalize_locale(declared) {
            Ok(tag) => return Ok(tag),
            Err(e) => warn!("{:?}: ignoring Language header: {}", relative_path, e),
        }
    }

    let directories = relative_path
        .parent()
        .into_iter()
        .flat_map(|parent| parent.components().rev())
        .filter_map(|component| match component {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .filter(|name| *name != "LC_MESSAGES");
    let stem = relative_path.file_stem().and_then(|s| s.to_str());

    directories
        .chain(stem)
        .find_map(|candidate| normalize_locale(candidate).ok())
        .ok_or_else(|| CatalogError::UnknownLanguage(catalog.path.clone()))
}
