/*!
 * Document and unit data model.
 *
 * A source ebook is split into an ordered list of translatable units (one per
 * page). Unit indices are 1-based, dense and immutable for the lifetime of a
 * run; they are the join key between the extracted pages, the checkpoint
 * ledger and the reassembled output.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Translation state of a single unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Not yet attempted
    Pending,
    /// An attempt was recorded but no result committed (a crash leaves
    /// units in this state; resume treats them as pending)
    InProgress,
    /// Translation committed
    Done,
    /// All retries exhausted
    Failed,
}

impl UnitStatus {
    /// Whether this unit still needs an oracle call
    pub fn needs_translation(&self) -> bool {
        !matches!(self, UnitStatus::Done)
    }
}

/// One translatable unit of the source document
#[derive(Debug, Clone)]
pub struct Unit {
    /// 1-based position in reading order, immutable
    pub index: u32,
    /// Source-language markdown for this page
    pub source_text: String,
    /// File names of images referenced by this unit, content-hashed
    pub assets: BTreeSet<String>,
}

impl Unit {
    pub fn new(index: u32, source_text: String) -> Self {
        Self {
            index,
            source_text,
            assets: BTreeSet::new(),
        }
    }

    /// Zero-padded page file name for this unit (page0001.md, ...)
    pub fn page_file_name(&self) -> String {
        format!("page{:04}.md", self.index)
    }
}

/// A source document split into ordered units
#[derive(Debug, Clone)]
pub struct Document {
    /// File stem of the input, used for titles and the work dir name
    pub base_name: String,
    /// Working directory holding pages, assets, checkpoint and outputs
    pub work_dir: PathBuf,
    /// Units in ascending index order, dense from 1
    pub units: Vec<Unit>,
}

impl Document {
    pub fn new(base_name: String, work_dir: PathBuf, units: Vec<Unit>) -> Self {
        Self {
            base_name,
            work_dir,
            units,
        }
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

/// Metadata persisted once per run in `run.json`.
///
/// Recording the original invocation lets a resumed run reuse the same
/// language pair, prompt and timestamp, so the merged output is byte-stable
/// across interruptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// Absolute path of the input file
    pub input_path: PathBuf,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Custom prompt given on the command line, if any
    #[serde(default)]
    pub custom_prompt: Option<String>,
    /// Number of extracted pages
    pub page_count: u32,
    /// RFC 3339 timestamp of the first run
    pub created_at: String,
}
