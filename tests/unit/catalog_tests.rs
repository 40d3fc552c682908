/*!
 * Tests for catalog parsing
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use typocat::catalog::TextField;
use typocat::{Catalog, CatalogError};

use crate::common;

#[test]
fn test_fromFile_withInvalidUtf8_shouldKeepOtherEntriesIntact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("de.po");
    let mut bytes = b"msgid \"Save\"\nmsgstr \"Speichern\"\n\nmsgid \"Open\"\nmsgstr \"".to_vec();
    bytes.extend_from_slice(&[0xC3, 0x28]);
    bytes.extend_from_slice(b"ffnen\"\n");
    fs::write(&path, bytes)?;

    let catalog = Catalog::from_file(&path)?;

    assert_eq!(catalog.entries.len(), 2);
    assert_eq!(catalog.entries[0].translated_text, "Speichern");
    assert!(catalog.entries[1].translated_text.contains('\u{FFFD}'));
    Ok(())
}

#[test]
fn test_fromFile_withLatin1Charset_shouldDecodeDeclaredCharset() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("de.po");
    let mut bytes = b"msgid \"\"\nmsgstr \"\"\n\"Language: de\\n\"\n\"Content-Type: text/plain; charset=ISO-8859-1\\n\"\n\nmsgid \"Open\"\nmsgstr \"".to_vec();
    bytes.push(0xD6);
    bytes.extend_from_slice(b"ffnen\"\n");
    fs::write(&path, bytes)?;

    let catalog = Catalog::from_file(&path)?;

    assert_eq!(catalog.header("Content-Type"), Some("text/plain; charset=ISO-8859-1"));
    assert_eq!(catalog.entries[0].translated_text, "Öffnen");
    Ok(())
}

#[test]
fn test_fromFile_withUnknownCharset_shouldReadAsUtf8() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("de.po");
    let content = "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=CHARSET\\n\"\n\nmsgid \"Open\"\nmsgstr \"Öffnen\"\n";
    fs::write(&path, content)?;

    let catalog = Catalog::from_file(&path)?;

    assert_eq!(catalog.entries[0].translated_text, "Öffnen");
    Ok(())
}

#[test]
fn test_parseStr_withBadEscapes_shouldKeepLaterEntries() -> Result<()> {
    let content = "msgid \"a\"\nmsgstr \"b\"\n\nmsgid \"b \\q c\"\nmsgstr \"x\\\"\n\nmsgid \"Helo\"\nmsgstr \"Hallo\"\n";
    let catalog = Catalog::parse_str(Path::new("de.po"), content)?;

    assert_eq!(catalog.entries.len(), 3);
    assert!(catalog.entries[0].malformed.is_empty());
    assert_eq!(catalog.entries[1].malformed, vec![TextField::Id, TextField::Str(0)]);
    assert_eq!(catalog.entries[2].source_text, "Helo");
    Ok(())
}

#[test]
fn test_fromFile_withMissingFile_shouldReturnIoError() {
    let result = Catalog::from_file("does/not/exist.po");
    assert!(matches!(result, Err(CatalogError::Io { .. })));
}

#[test]
fn test_parseStr_withEscapes_shouldDecodeThem() -> Result<()> {
    let content = r#"msgid "Say \"hi\"\tnow\\"
msgstr "Sag \"hallo\"\njetzt"
"#;
    let catalog = Catalog::parse_str(Path::new("x.po"), content)?;

    assert_eq!(catalog.entries[0].source_text, "Say \"hi\"\tnow\\");
    assert_eq!(catalog.entries[0].translated_text, "Sag \"hallo\"\njetzt");
    Ok(())
}

#[test]
fn test_parseStr_withUnknownKeyword_shouldFailWithLine() {
    let content = "msgid \"a\"\nmsgstr \"b\"\n\nmsgfoo \"c\"\n";
    let result = Catalog::parse_str(Path::new("x.po"), content);
    assert!(matches!(result, Err(CatalogError::Syntax { line: 4, .. })));
}

#[test]
fn test_parseStr_withFuzzyFlagBeforeBlankLine_shouldApplyToNextEntry() -> Result<()> {
    let content = "#, fuzzy\n\nmsgid \"a\"\nmsgstr \"b\"\n\nmsgid \"c\"\nmsgstr \"d\"\n";
    let catalog = Catalog::parse_str(Path::new("x.po"), content)?;

    assert!(catalog.entries[0].is_fuzzy);
    assert!(!catalog.entries[1].is_fuzzy);
    Ok(())
}

#[test]
fn test_parseStr_withContextOnHeaderLikeEntry_shouldKeepItAsEntry() -> Result<()> {
    let content = "msgctxt \"menu\"\nmsgid \"\"\nmsgstr \"Datei\"\n";
    let catalog = Catalog::parse_str(Path::new("x.po"), content)?;

    assert!(catalog.headers.is_empty());
    assert_eq!(catalog.entries.len(), 1);
    assert_eq!(catalog.entries[0].context.as_deref(), Some("menu"));
    assert_eq!(catalog.entries[0].line_number, 2);
    Ok(())
}

#[test]
fn test_entryTexts_withPlurals_shouldListEverySide() -> Result<()> {
    let content = "msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"fichier\"\nmsgstr[1] \"fichiers\"\n";
    let catalog = Catalog::parse_str(Path::new("fr.po"), content)?;
    let entry = &catalog.entries[0];

    let sources: Vec<&str> = entry.source_texts().map(|(_, text)| text).collect();
    let translations: Vec<&str> = entry.translated_texts().map(|(_, text)| text).collect();
    assert_eq!(sources, vec!["file", "files"]);
    assert_eq!(translations, vec!["fichier", "fichiers"]);
    Ok(())
}
