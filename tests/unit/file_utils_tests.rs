/*!
 * Tests for file utility functionality
 */

use anyhow::Result;
use shortcap::file_utils::FileManager;

use crate::common;

/// Test file existence check
#[test]
fn test_file_exists_withFileAndDir_shouldDistinguish() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let file = common::create_test_file(&dir.path().to_path_buf(), "script.txt", "내용")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.path()));
    assert!(!FileManager::file_exists(dir.path().join("missing.txt")));
    Ok(())
}

/// Test directory creation including parents
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let nested = dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    assert!(nested.is_dir());

    // Second call on an existing directory is a no-op
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

/// Test write and read round trip, creating parent directories
#[test]
fn test_write_and_read_withNestedPath_shouldRoundTrip() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("out").join("script.txt");

    FileManager::write_to_file(&path, "안녕하세요. 반갑습니다!")?;
    let content = FileManager::read_to_string(&path)?;

    assert_eq!(content, "안녕하세요. 반갑습니다!");
    Ok(())
}

/// Test subtitle output path derivation next to the script
#[test]
fn test_subtitle_output_path_withScriptFile_shouldSwapExtension() {
    let out = FileManager::subtitle_output_path("clips/episode1.txt", "ass");
    assert_eq!(out, std::path::PathBuf::from("clips/episode1.ass"));

    let bare = FileManager::subtitle_output_path("script.txt", "ass");
    assert_eq!(bare, std::path::PathBuf::from("./script.ass"));
}

/// Test script discovery finds only .txt files
#[test]
fn test_find_script_files_withMixedFiles_shouldReturnOnlyScripts() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let base = dir.path().to_path_buf();

    common::create_test_file(&base, "one.txt", "첫 대본")?;
    common::create_test_file(&base, "two.TXT", "둘째 대본")?;
    common::create_test_file(&base, "notes.md", "메모")?;
    common::create_test_file(&base, "audio.mp3", "")?;

    let found = FileManager::find_script_files(dir.path())?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| {
        p.extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case("txt"))
            .unwrap_or(false)
    }));
    Ok(())
}
