/*!
 * Integration tests for controller set-up, extension and failure handling
 */

use anyhow::Result;
use typocat::spelling::{Filter, FilterContext, MemorySource, Token};
use typocat::{AppError, ConfigError, Controller, DictionaryError, Reporter};

use crate::common;

/// Drops every token written in capitals only
struct AcronymFilter;

impl Filter for AcronymFilter {
    fn name(&self) -> &str {
        "acme.AcronymFilter"
    }

    fn accept(&self, token: &Token, _context: &FilterContext<'_>) -> bool {
        !token.text.chars().all(char::is_uppercase)
    }
}

#[test]
fn test_run_withUnknownChunker_shouldFailBeforeTouchingBuildDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.chunkers = vec!["words".to_string(), "acme.Missing".to_string()];
    config.build_dir = Some(temp_dir.path().join("build"));
    common::write_catalog(&config.locales_dir, "de", &[("hello", "Hallo")])?;

    let controller = common::test_controller(config);
    let mut reporter = Reporter::new(std::io::sink());
    let result = controller.run(&mut reporter);

    assert!(matches!(
        result,
        Err(AppError::Config(ConfigError::UnknownChunker(name))) if name == "acme.Missing"
    ));
    assert!(!temp_dir.path().join("build").exists());
    Ok(())
}

#[test]
fn test_run_withMissingDefaultLanguage_shouldFailValidation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.default_language = String::new();

    let controller = common::test_controller(config);
    let mut reporter = Reporter::new(std::io::sink());

    assert!(matches!(
        controller.run(&mut reporter),
        Err(AppError::Config(ConfigError::MissingOption("default_language")))
    ));
    Ok(())
}

#[test]
fn test_run_withRegisteredExternalFilter_shouldApplyIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.filters = vec!["acme.AcronymFilter".to_string()];
    common::write_catalog(&config.locales_dir, "de", &[("Open the GTK file", "Datei öffnen")])?;

    let mut controller = common::test_controller(config);
    controller
        .registry_mut()
        .register_filter("acme.AcronymFilter", || Box::new(AcronymFilter));

    let (summary, _) = common::run_controller(&controller)?;
    assert_eq!(summary.total_findings(), 0);
    Ok(())
}

#[test]
fn test_run_withCatalogLanguageWithoutDictionary_shouldSkipOnlyThatFile() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::write_catalog(&config.locales_dir, "de", &[("Helo", "Hallo")])?;
    common::write_catalog(&config.locales_dir, "it", &[("hello", "ciao")])?;

    let (summary, console) = common::run_controller(&common::test_controller(config))?;

    assert_eq!(summary.files_checked, 1);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(console, "ERROR: de/LC_MESSAGES/app.po:6: Helo\n");
    Ok(())
}

#[test]
fn test_run_withBrokenCatalog_shouldCountItAsFailed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::write_catalog(&config.locales_dir, "fr", &[("hello", "Bonjour")])?;
    common::create_test_file(&config.locales_dir, "de/LC_MESSAGES/app.po", "msgid \"unterminated\n")?;

    let (summary, _) = common::run_controller(&common::test_controller(config))?;

    assert_eq!(summary.files_checked, 1);
    assert_eq!(summary.files_failed, 1);
    Ok(())
}

#[test]
fn test_run_withoutSourceDictionary_shouldAbort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::write_catalog(&config.locales_dir, "de", &[("hello", "Hallo")])?;

    let source = MemorySource::new().with_language("de", ["Hallo"]);
    let controller = Controller::new(config, Box::new(source));
    let mut reporter = Reporter::new(std::io::sink());

    assert!(matches!(
        controller.run(&mut reporter),
        Err(AppError::Dictionary(DictionaryError::NotFound { .. }))
    ));
    Ok(())
}

#[test]
fn test_run_withMissingLocalesDir_shouldReportFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());

    let controller = common::test_controller(config);
    let mut reporter = Reporter::new(std::io::sink());

    assert!(matches!(controller.run(&mut reporter), Err(AppError::File(_))));
    Ok(())
}

#[test]
fn test_discoverCatalogs_withMixedFiles_shouldListOnlyCatalogs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    common::write_catalog(&config.locales_dir, "fr", &[])?;
    common::write_catalog(&config.locales_dir, "de", &[])?;
    common::create_test_file(&config.locales_dir, "de/LC_MESSAGES/app.mo", "")?;
    common::create_test_file(&config.locales_dir, "app.pot", "")?;

    let controller = common::test_controller(config.clone());
    let found = controller.discover_catalogs()?;

    assert_eq!(
        found,
        vec![
            config.locales_dir.join("de/LC_MESSAGES/app.po"),
            config.locales_dir.join("fr/LC_MESSAGES/app.po"),
        ]
    );
    Ok(())
}
