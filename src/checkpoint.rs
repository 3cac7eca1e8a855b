/*!
 * Checkpoint store: the durable per-unit translation ledger.
 *
 * The store is a single JSON file inside the working directory. It is the
 * single source of truth for which units are translated; the orchestrator
 * consults it before every oracle call and the reassembler reads only from
 * it. Every mutation rewrites the whole file through a temp-file rename, so
 * a crash at any point leaves either the previous or the new ledger on disk,
 * never a torn one.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::document::UnitStatus;
use crate::errors::CheckpointError;
use crate::file_utils::FileManager;

/// Ledger file name inside the work dir
pub const CHECKPOINT_FILE: &str = "checkpoint.json";

/// Per-unit entry in the ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointRecord {
    /// Current translation state
    pub status: UnitStatus,

    /// Committed translation, present iff status is Done
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,

    /// Number of oracle attempts made for this unit
    #[serde(default)]
    pub attempts: u32,

    /// Message of the most recent failure, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl CheckpointRecord {
    fn pending() -> Self {
        Self {
            status: UnitStatus::Pending,
            translated_text: None,
            attempts: 0,
            last_error: None,
        }
    }
}

/// On-disk shape of the ledger.
///
/// Unit indices are stored as a BTreeMap keyed by index so serialization
/// order is stable and the file diffs cleanly between commits.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CheckpointFile {
    units: BTreeMap<u32, CheckpointRecord>,
}

/// Durable per-unit translation ledger
pub struct CheckpointStore {
    path: PathBuf,
    units: BTreeMap<u32, CheckpointRecord>,
}

impl CheckpointStore {
    /// Open the ledger in a working directory, loading any existing state.
    ///
    /// A missing file is an empty ledger. A file that exists but cannot be
    /// parsed, or that violates the ledger's own invariants, is a fatal
    /// corruption error; it is never treated as empty because that would
    /// silently re-translate the whole document.
    pub fn open<P: AsRef<Path>>(work_dir: P) -> Result<Self, CheckpointError> {
        let path = work_dir.as_ref().join(CHECKPOINT_FILE);

        let units = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let file: CheckpointFile =
                serde_json::from_str(&raw).map_err(|e| CheckpointError::Corrupt {
                    path: path.clone(),
                    message: e.to_string(),
                })?;

            for (index, record) in &file.units {
                if record.status == UnitStatus::Done && record.translated_text.is_none() {
                    return Err(CheckpointError::Corrupt {
                        path: path.clone(),
                        message: format!("unit {} is done but has no translated text", index),
                    });
                }
                if *index == 0 {
                    return Err(CheckpointError::Corrupt {
                        path: path.clone(),
                        message: "unit index 0 is invalid, indices are 1-based".to_string(),
                    });
                }
            }

            debug!("Loaded checkpoint with {} unit records", file.units.len());
            file.units
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, units })
    }

    /// Path of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current record for a unit, if one exists
    pub fn record(&self, index: u32) -> Option<&CheckpointRecord> {
        self.units.get(&index)
    }

    /// All records, ascending by index
    pub fn records(&self) -> &BTreeMap<u32, CheckpointRecord> {
        &self.units
    }

    /// The state a unit should be treated as on this run.
    ///
    /// InProgress means a previous run crashed between recording an attempt
    /// and committing a result; the oracle call may or may not have happened,
    /// so the unit is retried. At-least-once oracle invocation, exactly-once
    /// appearance in the output.
    pub fn effective_status(&self, index: u32) -> UnitStatus {
        match self.units.get(&index) {
            None => UnitStatus::Pending,
            Some(record) => match record.status {
                UnitStatus::InProgress => UnitStatus::Pending,
                other => other,
            },
        }
    }

    /// Record that an oracle attempt is about to start.
    ///
    /// Durably committed before the oracle is called, so a crash mid-call is
    /// visible on resume as an InProgress unit.
    pub fn record_attempt(&mut self, index: u32) -> Result<(), CheckpointError> {
        let record = self
            .units
            .entry(index)
            .or_insert_with(CheckpointRecord::pending);
        record.status = UnitStatus::InProgress;
        record.attempts += 1;
        record.translated_text = None;
        self.flush()
    }

    /// Commit a successful translation for a unit
    pub fn commit_success(&mut self, index: u32, text: String) -> Result<(), CheckpointError> {
        let record = self
            .units
            .entry(index)
            .or_insert_with(CheckpointRecord::pending);
        record.status = UnitStatus::Done;
        record.translated_text = Some(text);
        record.last_error = None;
        self.flush()
    }

    /// Commit a terminal failure for a unit after retries are exhausted
    pub fn commit_failure(&mut self, index: u32, error: &str) -> Result<(), CheckpointError> {
        let record = self
            .units
            .entry(index)
            .or_insert_with(CheckpointRecord::pending);
        record.status = UnitStatus::Failed;
        record.translated_text = None;
        record.last_error = Some(error.to_string());
        self.flush()
    }

    /// Indices of units among `1..=total` that are not Done, ascending
    pub fn missing_indices(&self, total: u32) -> Vec<u32> {
        (1..=total)
            .filter(|i| self.effective_status(*i) != UnitStatus::Done)
            .collect()
    }

    /// Number of Done units
    pub fn done_count(&self) -> usize {
        self.units
            .values()
            .filter(|r| r.status == UnitStatus::Done)
            .count()
    }

    // Serialize the whole ledger and atomically replace the file
    fn flush(&self) -> Result<(), CheckpointError> {
        let file = CheckpointFile {
            units: self.units.clone(),
        };
        // Pretty-printed so the ledger stays human-diffable
        let json = serde_json::to_string_pretty(&file)
            .expect("checkpoint serialization cannot fail for valid records");
        FileManager::write_atomic(&self.path, &json)?;
        Ok(())
    }
}
