/*!
 * Tests for error types and conversions
 */

use std::io;
use std::path::PathBuf;
use typocat::{AppError, CatalogCheckError, CatalogError, CheckError, ConfigError, DictionaryError};

#[test]
fn test_configError_unknownFilter_shouldNameTheFilter() {
    let error = ConfigError::UnknownFilter("acme.Missing".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Unknown filter"));
    assert!(display.contains("acme.Missing"));
}

#[test]
fn test_dictionaryError_notFound_shouldDisplayLanguageAndPath() {
    let error = DictionaryError::NotFound {
        language: "pt_BR".to_string(),
        searched: PathBuf::from("/usr/share/hunspell"),
    };
    let display = format!("{}", error);
    assert!(display.contains("pt_BR"));
    assert!(display.contains("/usr/share/hunspell"));
}

#[test]
fn test_catalogError_syntax_shouldDisplayLine() {
    let error = CatalogError::Syntax {
        path: PathBuf::from("de.po"),
        line: 12,
        reason: "unterminated string".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("line 12"));
    assert!(display.contains("unterminated string"));
}

#[test]
fn test_checkError_malformedText_shouldCompareByValue() {
    let a = CheckError::MalformedText("bad bytes".to_string());
    assert_eq!(a.clone(), a);
    assert!(a.to_string().starts_with("Malformed text"));
}

#[test]
fn test_appError_fromConfigError_shouldWrap() {
    let error: AppError = ConfigError::MissingOption("locales_dir").into();
    assert!(matches!(error, AppError::Config(ConfigError::MissingOption("locales_dir"))));
    assert!(error.to_string().contains("locales_dir"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeOutputError() {
    let error: AppError = io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into();
    assert!(matches!(error, AppError::Output(ref msg) if msg.contains("read-only")));
}

#[test]
fn test_catalogCheckError_fromCatalogError_shouldWrap() {
    let error: CatalogCheckError = CatalogError::UnknownLanguage(PathBuf::from("x.po")).into();
    let app_error: AppError = error.into();
    assert!(matches!(
        app_error,
        AppError::Check(CatalogCheckError::Catalog(CatalogError::UnknownLanguage(_)))
    ));
}
