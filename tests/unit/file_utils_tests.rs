/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use typocat::file_utils::FileManager;

use crate::common;

/// Test that dir_exists only accepts directories
#[test]
fn test_dir_exists_withFileAndDir_shouldOnlyAcceptDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file.tmp", "test content")?;

    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&test_file));
    assert!(!FileManager::dir_exists("non_existent_dir"));
    Ok(())
}

/// Test that recreate_dir creates a missing directory
#[test]
fn test_recreate_dir_withMissingDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let build = temp_dir.path().join("nested/build");

    FileManager::recreate_dir(&build)?;

    assert!(FileManager::dir_exists(&build));
    Ok(())
}

/// Test that recreate_dir replaces a file standing where the directory should be
#[test]
fn test_recreate_dir_withFileInTheWay_shouldReplaceIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let build = common::create_test_file(temp_dir.path(), "build", "not a directory")?;

    FileManager::recreate_dir(&build)?;

    assert!(FileManager::dir_exists(&build));
    Ok(())
}

/// Test that find_files returns nothing for an empty tree
#[test]
fn test_find_files_withEmptyDir_shouldReturnEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::find_files(temp_dir.path(), "po")?.is_empty());
    Ok(())
}
