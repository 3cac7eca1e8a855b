/*!
 * Unit tests for file utilities
 */

use bookwai::file_utils::{DocumentType, FileManager};

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_fileExists_withRealFile_shouldBeTrue() {
    let dir = create_temp_dir().unwrap();
    let file = create_test_file(dir.path(), "a.md", "hello").unwrap();
    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.path().join("missing.md")));
}

#[test]
fn test_ensureDir_withNestedPath_shouldCreateParents() {
    let dir = create_temp_dir().unwrap();
    let nested = dir.path().join("a/b/c");
    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));
}

#[test]
fn test_findFiles_shouldReturnSortedMatches() {
    let dir = create_temp_dir().unwrap();
    create_test_file(dir.path(), "page0002.md", "b").unwrap();
    create_test_file(dir.path(), "page0001.md", "a").unwrap();
    create_test_file(dir.path(), "notes.txt", "x").unwrap();

    let files = FileManager::find_files(dir.path(), "md").unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("page0001.md"));
    assert!(files[1].ends_with("page0002.md"));
}

#[test]
fn test_writeAtomic_shouldNotLeaveTempFilesBehind() {
    let dir = create_temp_dir().unwrap();
    let target = dir.path().join("state.json");
    FileManager::write_atomic(&target, "{}").unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["state.json".to_string()]);
}

#[test]
fn test_hashFileShort_shouldBeStableAndContentSensitive() {
    let dir = create_temp_dir().unwrap();
    let a = create_test_file(dir.path(), "a.png", "same bytes").unwrap();
    let b = create_test_file(dir.path(), "b.png", "same bytes").unwrap();
    let c = create_test_file(dir.path(), "c.png", "other bytes").unwrap();

    let hash_a = FileManager::hash_file_short(&a).unwrap();
    let hash_b = FileManager::hash_file_short(&b).unwrap();
    let hash_c = FileManager::hash_file_short(&c).unwrap();

    assert_eq!(hash_a.len(), 16);
    assert_eq!(hash_a, hash_b);
    assert_ne!(hash_a, hash_c);
}

#[test]
fn test_detectDocumentType_shouldBeCaseInsensitive() {
    assert_eq!(
        FileManager::detect_document_type("Book.PDF"),
        DocumentType::Pdf
    );
    assert_eq!(
        FileManager::detect_document_type("book.Epub"),
        DocumentType::Epub
    );
    assert_eq!(
        FileManager::detect_document_type("archive.zip"),
        DocumentType::Unknown
    );
}
