/*!
 * Reassembler: merges translated units into one markdown document.
 *
 * Reads translations from the checkpoint ledger only, never from memory, so
 * the merge can run in a fresh process after any number of interrupted
 * translation passes. Output is deterministic: the same ledger and run
 * metadata always produce byte-identical markdown.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

use crate::checkpoint::CheckpointStore;
use crate::document::{Document, RunMetadata, UnitStatus};
use crate::errors::ReassemblyError;
use crate::file_utils::FileManager;

/// Merged output file name inside the work dir
pub const MERGED_FILE: &str = "book.md";

/// Separator written between pages
const PAGE_SEPARATOR: &str = "\n\n---\n\n";

// Markdown image syntax: ![alt](path)
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image regex is valid"));

/// How to treat units without a committed translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReassemblyMode {
    /// Refuse to merge unless every unit is Done
    #[default]
    Strict,
    /// Merge anyway, rendering a visible placeholder for each gap
    BestEffort,
}

/// Merges translated units into `book.md`
pub struct Reassembler {
    mode: ReassemblyMode,
}

impl Reassembler {
    pub fn new(mode: ReassemblyMode) -> Self {
        Self { mode }
    }

    /// Merge the document's translations and write `book.md` in the work dir.
    ///
    /// Returns the merged markdown. In strict mode an incomplete ledger is an
    /// error naming every missing index; nothing is written in that case.
    pub fn merge(
        &self,
        document: &Document,
        store: &CheckpointStore,
        metadata: &RunMetadata,
    ) -> Result<String, ReassemblyError> {
        let total = document.units.len() as u32;

        if self.mode == ReassemblyMode::Strict {
            let missing = store.missing_indices(total);
            if !missing.is_empty() {
                return Err(ReassemblyError::Incomplete { missing });
            }
        }

        let asset_names = known_assets(&document.work_dir.join("assets"));

        let mut pages: Vec<String> = Vec::with_capacity(document.units.len());
        for unit in &document.units {
            let page = match store.record(unit.index) {
                Some(record) if record.status == UnitStatus::Done => record
                    .translated_text
                    .as_deref()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                _ => format!("> [untranslated: page {}]", unit.index),
            };
            pages.push(fix_image_references(&page, &asset_names));
        }

        let mut output = metadata_header(&document.base_name, metadata);
        output.push_str(&pages.join(PAGE_SEPARATOR));
        output.push('\n');

        let path = document.work_dir.join(MERGED_FILE);
        FileManager::write_atomic(&path, &output)?;

        Ok(output)
    }
}

// Rewrite image references whose file name is a known asset so they resolve
// relative to the merged file. Unknown references are left untouched.
fn fix_image_references(content: &str, asset_names: &BTreeSet<String>) -> String {
    IMAGE_RE
        .replace_all(content, |caps: &regex::Captures| {
            let alt = &caps[1];
            let path = &caps[2];
            let name = Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if asset_names.contains(&name) {
                format!("![{}](assets/{})", alt, name)
            } else {
                caps[0].to_string()
            }
        })
        .to_string()
}

fn known_assets(assets_dir: &Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    if let Ok(entries) = std::fs::read_dir(assets_dir) {
        for entry in entries.flatten() {
            if entry.path().is_file() {
                names.insert(entry.file_name().to_string_lossy().to_string());
            }
        }
    }
    names
}

// Book header prepended to the merged document. Uses the timestamp stored in
// run.json, not the current time, so reruns stay byte-stable.
fn metadata_header(base_name: &str, metadata: &RunMetadata) -> String {
    format!(
        "# {}\n\n\
         **Translation info:**\n\
         - Source file: {}\n\
         - Languages: {} -> {}\n\
         - Translated: {}\n\
         - Custom prompt: {}\n\n\
         ---\n\n",
        base_name,
        metadata.input_path.display(),
        metadata.source_language,
        metadata.target_language,
        metadata.created_at,
        metadata.custom_prompt.as_deref().unwrap_or("none"),
    )
}
