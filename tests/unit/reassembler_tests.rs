/*!
 * Unit tests for the reassembler
 */

use bookwai::checkpoint::CheckpointStore;
use bookwai::errors::ReassemblyError;
use bookwai::pipeline::reassembler::MERGED_FILE;
use bookwai::pipeline::{Reassembler, ReassemblyMode};

use crate::common::{create_temp_dir, test_document, test_run_metadata};

#[test]
fn test_merge_strict_shouldNameEveryMissingIndex() {
    let dir = create_temp_dir().unwrap();
    let document = test_document(dir.path(), &["a", "b", "c", "d"]);
    let mut store = CheckpointStore::open(dir.path()).unwrap();
    store.commit_success(1, "un".to_string()).unwrap();
    store.commit_success(3, "trois".to_string()).unwrap();

    let result =
        Reassembler::new(ReassemblyMode::Strict).merge(&document, &store, &test_run_metadata(4));

    match result {
        Err(ReassemblyError::Incomplete { missing }) => assert_eq!(missing, vec![2, 4]),
        other => panic!("expected Incomplete, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_merge_strictFailure_shouldNotWriteOutputFile() {
    let dir = create_temp_dir().unwrap();
    let document = test_document(dir.path(), &["a", "b"]);
    let store = CheckpointStore::open(dir.path()).unwrap();

    let _ = Reassembler::new(ReassemblyMode::Strict).merge(&document, &store, &test_run_metadata(2));
    assert!(!dir.path().join(MERGED_FILE).exists());
}

#[test]
fn test_merge_bestEffort_shouldKeepPlaceholderVisibleAndOrdered() {
    let dir = create_temp_dir().unwrap();
    let document = test_document(dir.path(), &["a", "b", "c"]);
    let mut store = CheckpointStore::open(dir.path()).unwrap();
    store.commit_success(1, "premier".to_string()).unwrap();
    store.commit_failure(2, "oracle down").unwrap();
    store.commit_success(3, "troisieme".to_string()).unwrap();

    let merged = Reassembler::new(ReassemblyMode::BestEffort)
        .merge(&document, &store, &test_run_metadata(3))
        .unwrap();

    let p1 = merged.find("premier").unwrap();
    let p2 = merged.find("> [untranslated: page 2]").unwrap();
    let p3 = merged.find("troisieme").unwrap();
    assert!(p1 < p2 && p2 < p3);
}

#[test]
fn test_merge_shouldSeparatePagesWithRule() {
    let dir = create_temp_dir().unwrap();
    let document = test_document(dir.path(), &["a", "b"]);
    let mut store = CheckpointStore::open(dir.path()).unwrap();
    store.commit_success(1, "Un.".to_string()).unwrap();
    store.commit_success(2, "Deux.".to_string()).unwrap();

    let merged = Reassembler::new(ReassemblyMode::Strict)
        .merge(&document, &store, &test_run_metadata(2))
        .unwrap();

    assert!(merged.contains("Un.\n\n---\n\nDeux."));
}

#[test]
fn test_merge_headerShouldUseStoredRunTimestamp() {
    let dir = create_temp_dir().unwrap();
    let document = test_document(dir.path(), &["a"]);
    let mut store = CheckpointStore::open(dir.path()).unwrap();
    store.commit_success(1, "texte".to_string()).unwrap();

    let merged = Reassembler::new(ReassemblyMode::Strict)
        .merge(&document, &store, &test_run_metadata(1))
        .unwrap();

    assert!(merged.starts_with("# book\n"));
    assert!(merged.contains("2024-06-01T12:00:00Z"));
    assert!(merged.contains("en -> fr"));
}

#[test]
fn test_merge_shouldRewriteImageReferencesToAssetsDir() {
    let dir = create_temp_dir().unwrap();
    let assets = dir.path().join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(assets.join("img-cafe01.png"), b"png").unwrap();

    let document = test_document(dir.path(), &["a"]);
    let mut store = CheckpointStore::open(dir.path()).unwrap();
    store
        .commit_success(1, "Voir ![figure](img-cafe01.png).".to_string())
        .unwrap();

    let merged = Reassembler::new(ReassemblyMode::Strict)
        .merge(&document, &store, &test_run_metadata(1))
        .unwrap();

    assert!(merged.contains("![figure](assets/img-cafe01.png)"));
}
