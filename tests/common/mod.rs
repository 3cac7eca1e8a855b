/*!
 * Common test utilities for the bookwai test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use bookwai::document::{Document, RunMetadata, Unit};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a document with one unit per given page text, work dir attached
pub fn test_document(work_dir: &Path, pages: &[&str]) -> Document {
    let units = pages
        .iter()
        .enumerate()
        .map(|(i, text)| Unit::new((i + 1) as u32, text.to_string()))
        .collect();
    Document::new("book".to_string(), work_dir.to_path_buf(), units)
}

/// Run metadata with a fixed timestamp so merges are reproducible
pub fn test_run_metadata(pages: u32) -> RunMetadata {
    RunMetadata {
        input_path: PathBuf::from("book.pdf"),
        source_language: "en".to_string(),
        target_language: "fr".to_string(),
        custom_prompt: None,
        page_count: pages,
        created_at: "2024-06-01T12:00:00Z".to_string(),
    }
}
