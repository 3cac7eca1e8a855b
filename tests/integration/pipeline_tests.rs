/*!
 * Integration tests for the full extract / translate / reassemble pipeline
 */

use bookwai::checkpoint::CheckpointStore;
use bookwai::document::Document;
use bookwai::errors::ReassemblyError;
use bookwai::extractor::{FixtureBackend, UnitExtractor};
use bookwai::pipeline::{Reassembler, ReassemblyMode, TocBuilder, TranslationOrchestrator};
use bookwai::providers::mock::MockOracle;

use crate::common::{create_temp_dir, create_test_file, test_run_metadata};

async fn extract_fixture(
    work_dir: &std::path::Path,
    source: &std::path::Path,
    pages: &[&str],
) -> Document {
    let backend = FixtureBackend::new(pages.iter().map(|p| p.to_string()).collect());
    let units = UnitExtractor::new(backend)
        .extract_or_reuse(source, work_dir, None)
        .await
        .unwrap();
    Document::new("book".to_string(), work_dir.to_path_buf(), units)
}

#[tokio::test]
async fn test_pipeline_happyPath_shouldProduceTocAndOrderedBook() {
    let dir = create_temp_dir().unwrap();
    let source = create_test_file(dir.path(), "book.pdf", "%PDF").unwrap();
    let work_dir = dir.path().join("book_work");
    std::fs::create_dir_all(&work_dir).unwrap();

    let document = extract_fixture(
        &work_dir,
        &source,
        &["# Chapter One\n\nFirst page.", "More prose.", "# Chapter Two\n\nLast page."],
    )
    .await;

    let mut store = CheckpointStore::open(&work_dir).unwrap();
    let oracle = MockOracle::working();
    let orchestrator = TranslationOrchestrator::new(Box::new(oracle), 3, 0);
    let summary = orchestrator
        .run(&document, &mut store, "en", "fr", "translate", |_, _| {})
        .await
        .unwrap();

    assert_eq!(summary.done, 3);
    assert_eq!(summary.failed, 0);

    let merged = Reassembler::new(ReassemblyMode::Strict)
        .merge(&document, &store, &test_run_metadata(3))
        .unwrap();

    let first = merged.find("[fr] # Chapter One").unwrap();
    let second = merged.find("[fr] More prose.").unwrap();
    let third = merged.find("[fr] # Chapter Two").unwrap();
    assert!(first < second && second < third);
    assert!(work_dir.join("book.md").is_file());

    // The metadata header contributes the book title heading
    let (augmented, entries) = TocBuilder::build(&merged);
    assert_eq!(entries[0].title, "book");
    assert!(augmented.contains("{#book}"));
}

#[tokio::test]
async fn test_pipeline_oneBadUnit_shouldNotAbortTheOthers() {
    let dir = create_temp_dir().unwrap();
    let source = create_test_file(dir.path(), "book.pdf", "%PDF").unwrap();
    let work_dir = dir.path().join("book_work");
    std::fs::create_dir_all(&work_dir).unwrap();

    let document =
        extract_fixture(&work_dir, &source, &["page one", "POISON page", "page three"]).await;

    let mut store = CheckpointStore::open(&work_dir).unwrap();
    let orchestrator =
        TranslationOrchestrator::new(Box::new(MockOracle::failing_on("POISON")), 2, 0);
    let summary = orchestrator
        .run(&document, &mut store, "en", "fr", "translate", |_, _| {})
        .await
        .unwrap();

    assert_eq!(summary.done, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, 2);
    assert_eq!(store.record(2).unwrap().attempts, 2);
    assert!(store.record(2).unwrap().last_error.is_some());

    // Strict reassembly refuses the hole and names it
    let strict = Reassembler::new(ReassemblyMode::Strict).merge(
        &document,
        &store,
        &test_run_metadata(3),
    );
    match strict {
        Err(ReassemblyError::Incomplete { missing }) => assert_eq!(missing, vec![2]),
        other => panic!("expected Incomplete, got {:?}", other.map(|_| ())),
    }

    // Best effort keeps the hole visible instead
    let merged = Reassembler::new(ReassemblyMode::BestEffort)
        .merge(&document, &store, &test_run_metadata(3))
        .unwrap();
    assert!(merged.contains("> [untranslated: page 2]"));
    assert!(merged.contains("[fr] page one"));
    assert!(merged.contains("[fr] page three"));
}

#[tokio::test]
async fn test_pipeline_progressCallback_shouldCoverEveryUnit() {
    let dir = create_temp_dir().unwrap();
    let source = create_test_file(dir.path(), "book.pdf", "%PDF").unwrap();
    let work_dir = dir.path().join("book_work");
    std::fs::create_dir_all(&work_dir).unwrap();

    let document = extract_fixture(&work_dir, &source, &["a", "b", "c"]).await;
    let mut store = CheckpointStore::open(&work_dir).unwrap();

    let seen = std::sync::Mutex::new(Vec::new());
    let orchestrator = TranslationOrchestrator::new(Box::new(MockOracle::working()), 3, 0);
    orchestrator
        .run(&document, &mut store, "en", "fr", "translate", |done, total| {
            seen.lock().unwrap().push((done, total));
        })
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}
