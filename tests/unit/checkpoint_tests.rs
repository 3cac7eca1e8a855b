/*!
 * Unit tests for the checkpoint ledger
 */

use bookwai::checkpoint::{CheckpointStore, CHECKPOINT_FILE};
use bookwai::document::UnitStatus;
use bookwai::errors::CheckpointError;

use crate::common::create_temp_dir;

#[test]
fn test_commitSuccess_shouldWriteParseableJsonFile() {
    let dir = create_temp_dir().unwrap();
    let mut store = CheckpointStore::open(dir.path()).unwrap();
    store.commit_success(1, "Bonjour".to_string()).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(CHECKPOINT_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["units"]["1"]["status"], "done");
    assert_eq!(value["units"]["1"]["translatedText"], "Bonjour");
}

#[test]
fn test_everyMutation_shouldLeaveValidFileOnDisk() {
    let dir = create_temp_dir().unwrap();
    let mut store = CheckpointStore::open(dir.path()).unwrap();

    store.record_attempt(1).unwrap();
    assert!(CheckpointStore::open(dir.path()).is_ok());

    store.commit_failure(1, "boom").unwrap();
    assert!(CheckpointStore::open(dir.path()).is_ok());

    store.commit_success(1, "ok".to_string()).unwrap();
    let reread = CheckpointStore::open(dir.path()).unwrap();
    assert_eq!(reread.record(1).unwrap().status, UnitStatus::Done);
}

#[test]
fn test_open_withTruncatedFile_shouldReportCorruptionNotEmpty() {
    let dir = create_temp_dir().unwrap();
    std::fs::write(dir.path().join(CHECKPOINT_FILE), "{\"units\": {\"1\"").unwrap();

    match CheckpointStore::open(dir.path()) {
        Err(CheckpointError::Corrupt { path, .. }) => {
            assert!(path.ends_with(CHECKPOINT_FILE));
        }
        other => panic!("expected corruption error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_open_withZeroIndex_shouldReportCorruption() {
    let dir = create_temp_dir().unwrap();
    let raw = r#"{"units": {"0": {"status": "pending", "attempts": 0}}}"#;
    std::fs::write(dir.path().join(CHECKPOINT_FILE), raw).unwrap();
    assert!(matches!(
        CheckpointStore::open(dir.path()),
        Err(CheckpointError::Corrupt { .. })
    ));
}

#[test]
fn test_effectiveStatus_inProgressAfterReopen_shouldBePending() {
    let dir = create_temp_dir().unwrap();
    {
        let mut store = CheckpointStore::open(dir.path()).unwrap();
        store.record_attempt(5).unwrap();
    }

    let store = CheckpointStore::open(dir.path()).unwrap();
    assert_eq!(store.record(5).unwrap().status, UnitStatus::InProgress);
    assert_eq!(store.effective_status(5), UnitStatus::Pending);
}

#[test]
fn test_attempts_shouldAccumulateAcrossReopens() {
    let dir = create_temp_dir().unwrap();
    {
        let mut store = CheckpointStore::open(dir.path()).unwrap();
        store.record_attempt(1).unwrap();
    }
    {
        let mut store = CheckpointStore::open(dir.path()).unwrap();
        store.record_attempt(1).unwrap();
        store.commit_success(1, "done".to_string()).unwrap();
    }

    let store = CheckpointStore::open(dir.path()).unwrap();
    assert_eq!(store.record(1).unwrap().attempts, 2);
}

#[test]
fn test_serializedLedger_shouldKeepIndicesInAscendingOrder() {
    let dir = create_temp_dir().unwrap();
    let mut store = CheckpointStore::open(dir.path()).unwrap();
    store.commit_success(10, "j".to_string()).unwrap();
    store.commit_success(2, "b".to_string()).unwrap();
    store.commit_success(1, "a".to_string()).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(CHECKPOINT_FILE)).unwrap();
    let pos_1 = raw.find("\"1\"").unwrap();
    let pos_2 = raw.find("\"2\"").unwrap();
    let pos_10 = raw.find("\"10\"").unwrap();
    assert!(pos_1 < pos_2 && pos_2 < pos_10);
}
