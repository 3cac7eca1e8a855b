/*!
 * Translation orchestrator.
 *
 * Walks the document's units in ascending index order and drives the oracle
 * over every unit that is not already Done in the checkpoint ledger. The
 * ledger is committed before and after every oracle call, so the process can
 * be killed at any instant and resumed without losing completed work.
 */

use log::{debug, info, warn};
use std::time::Duration;

use crate::checkpoint::CheckpointStore;
use crate::document::{Document, UnitStatus};
use crate::errors::CheckpointError;
use crate::providers::{OracleRequest, TranslationOracle};

/// Outcome of one orchestration pass
#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Units translated during this pass
    pub done: usize,
    /// Units that exhausted their retries during this pass
    pub failed: usize,
    /// Units already Done before this pass started
    pub skipped: usize,
    /// Index and final error message of every failed unit
    pub failures: Vec<(u32, String)>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Drives the translation oracle over a document's units
pub struct TranslationOrchestrator {
    oracle: Box<dyn TranslationOracle>,
    /// Oracle attempts per unit before giving up
    retry_count: u32,
    /// Base backoff in milliseconds, multiplied by the attempt number
    retry_backoff_ms: u64,
}

impl TranslationOrchestrator {
    pub fn new(oracle: Box<dyn TranslationOracle>, retry_count: u32, retry_backoff_ms: u64) -> Self {
        Self {
            oracle,
            // A retry count of zero would mean never calling the oracle
            retry_count: retry_count.max(1),
            retry_backoff_ms,
        }
    }

    /// Translate every unit that still needs it, sequentially.
    ///
    /// A unit whose retries are exhausted is committed as Failed and the run
    /// moves on to the next unit; only ledger I/O errors abort the pass.
    /// `progress` is called once per unit with (processed, total).
    pub async fn run(
        &self,
        document: &Document,
        store: &mut CheckpointStore,
        source_language: &str,
        target_language: &str,
        system_prompt: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<RunSummary, CheckpointError> {
        let total = document.units.len();
        let mut summary = RunSummary::default();

        info!(
            "Translating {} units with the {} oracle ({} -> {})",
            total,
            self.oracle.name(),
            source_language,
            target_language
        );

        for (position, unit) in document.units.iter().enumerate() {
            if store.effective_status(unit.index) == UnitStatus::Done {
                debug!("Unit {} already translated, skipping", unit.index);
                summary.skipped += 1;
                progress(position + 1, total);
                continue;
            }

            // Empty pages need no oracle call
            if unit.source_text.trim().is_empty() {
                store.commit_success(unit.index, String::new())?;
                summary.done += 1;
                progress(position + 1, total);
                continue;
            }

            let request = OracleRequest {
                text: unit.source_text.clone(),
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
                system_prompt: system_prompt.to_string(),
            };

            match self.translate_unit(unit.index, &request, store).await? {
                Ok(()) => summary.done += 1,
                Err(message) => {
                    summary.failed += 1;
                    summary.failures.push((unit.index, message));
                }
            }

            progress(position + 1, total);
        }

        info!(
            "Translation pass finished: {} done, {} failed, {} skipped",
            summary.done, summary.failed, summary.skipped
        );

        Ok(summary)
    }

    // Bounded retry loop for one unit. The outer Result carries ledger I/O
    // errors; the inner one reports whether the unit ended Done or Failed.
    async fn translate_unit(
        &self,
        index: u32,
        request: &OracleRequest,
        store: &mut CheckpointStore,
    ) -> Result<Result<(), String>, CheckpointError> {
        let mut last_error = String::new();

        for attempt in 1..=self.retry_count {
            // Committed before the oracle call, so a crash mid-call is
            // visible on resume
            store.record_attempt(index)?;

            match self.oracle.translate(request).await {
                Ok(text) => {
                    store.commit_success(index, text)?;
                    return Ok(Ok(()));
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(
                        "Unit {} attempt {}/{} failed: {}",
                        index, attempt, self.retry_count, last_error
                    );

                    if attempt < self.retry_count {
                        let backoff = Duration::from_millis(self.retry_backoff_ms * attempt as u64);
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        store.commit_failure(index, &last_error)?;
        Ok(Err(last_error))
    }
}
