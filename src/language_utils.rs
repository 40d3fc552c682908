use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for gettext locale handling
///
/// Catalogs declare their language as a gettext locale (`de`, `pt_BR`,
/// `sr@latin`, `de_DE.UTF-8`). Dictionaries and ignore files are looked up by
/// the normalized form (`pt_BR`). The primary subtag is validated against
/// ISO 639-1 / ISO 639-2 through `isolang`.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if part2b_to_part2t(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// A parsed gettext locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Lowercase primary language subtag (`pt`)
    pub language: String,
    /// Uppercase region subtag (`BR`)
    pub region: Option<String>,
    /// Modifier after `@` (`latin`)
    pub modifier: Option<String>,
}

impl Locale {
    /// Parse a locale such as `pt_BR`, `pt-br`, `sr@latin` or `de_DE.UTF-8`
    pub fn parse(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        let (rest, modifier) = match trimmed.split_once('@') {
            Some((rest, modifier)) if !modifier.is_empty() => (rest, Some(modifier.to_lowercase())),
            Some((rest, _)) => (rest, None),
            None => (trimmed, None),
        };
        // Drop the codeset (`.UTF-8`)
        let rest = rest.split('.').next().unwrap_or_default();

        let mut parts = rest.split(['_', '-']);
        let language = parts.next().unwrap_or_default().to_lowercase();
        validate_language_code(&language)?;

        let region = parts
            .next()
            .filter(|r| !r.is_empty())
            .map(|r| r.to_uppercase());

        Ok(Self { language, region, modifier })
    }

    /// Canonical `language[_REGION][@modifier]` form used for file lookups
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        if let Some(region) = &self.region {
            tag.push('_');
            tag.push_str(region);
        }
        if let Some(modifier) = &self.modifier {
            tag.push('@');
            tag.push_str(modifier);
        }
        tag
    }

    /// File stems to try when looking up dictionaries, most specific first
    pub fn lookup_candidates(&self) -> Vec<String> {
        let mut candidates = vec![self.tag()];
        if let Some(region) = &self.region {
            let with_region = format!("{}_{}", self.language, region);
            if !candidates.contains(&with_region) {
                candidates.push(with_region);
            }
        }
        if !candidates.contains(&self.language) {
            candidates.push(self.language.clone());
        }
        candidates
    }
}

/// Normalize a locale to its canonical tag (`pt-br` -> `pt_BR`)
pub fn normalize_locale(code: &str) -> Result<String> {
    Ok(Locale::parse(code)?.tag())
}

/// Get the English language name of a locale's primary subtag
pub fn get_language_name(code: &str) -> Result<String> {
    let locale = Locale::parse(code)?;
    let lang = if locale.language.len() == 2 {
        Language::from_639_1(&locale.language)
    } else {
        let part2t = part2b_to_part2t(&locale.language).unwrap_or(&locale.language);
        Language::from_639_3(part2t)
    };

    lang.map(|l| l.to_name().to_string())
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))
}
