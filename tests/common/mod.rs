/*!
 * Common test utilities for the slidereel test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use slidereel::subtitle_processor::SubtitleEntry;

/// Route library logging through env_logger, once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}

/// Creates placeholder image files. Content is irrelevant, only the extension
/// is used for classification.
pub fn create_test_images(dir: &Path, names: &[&str]) -> Result<Vec<PathBuf>> {
    names
        .iter()
        .map(|name| create_test_file(dir, name, "not really an image"))
        .collect()
}

/// Creates a placeholder audio file
pub fn create_test_audio(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really audio")
}

/// Shorthand for a cue
pub fn cue(seq_num: usize, start_secs: f64, end_secs: f64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(seq_num, start_secs, end_secs, text.to_string())
}
