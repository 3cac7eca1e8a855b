use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, OracleProvider};
use crate::checkpoint::CheckpointStore;
use crate::document::{Document, RunMetadata};
use crate::extractor::{PandocBackend, UnitExtractor};
use crate::file_utils::{DocumentType, FileManager};
use crate::pipeline::{Reassembler, ReassemblyMode, RunSummary, TocBuilder, TranslationOrchestrator};
use crate::providers::anthropic::AnthropicOracle;
use crate::providers::ollama::OllamaOracle;
use crate::providers::TranslationOracle;
use crate::render::HtmlRenderer;

// Application controller for the ebook translation pipeline

/// Run metadata file name inside the work dir
pub const RUN_FILE: &str = "run.json";

/// Per-invocation options resolved from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Source document to translate
    pub input_file: PathBuf,
    /// Working directory override; defaults to `<stem>_work` next to the input
    pub work_dir: Option<PathBuf>,
    /// Custom system prompt override
    pub custom_prompt: Option<String>,
    /// Merge even if some units failed, with visible placeholders
    pub best_effort: bool,
    /// Discard any existing working directory and start over
    pub fresh: bool,
}

/// Main application controller for ebook translation
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Default working directory for an input file
    pub fn default_work_dir(input_file: &Path) -> PathBuf {
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "book".to_string());
        input_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}_work", stem))
    }

    /// Run the whole pipeline: extract, translate, merge, build ToC, render.
    ///
    /// Returns the translation summary. The merged and rendered outputs are
    /// written into the working directory; callers decide the exit status
    /// from `summary.has_failures()`.
    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        let input_file = &options.input_file;
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if FileManager::detect_document_type(input_file) == DocumentType::Unknown {
            return Err(anyhow!(
                "Unsupported document format: {:?} (supported: pdf, docx, epub)",
                input_file
            ));
        }

        let work_dir = options
            .work_dir
            .clone()
            .unwrap_or_else(|| Self::default_work_dir(input_file));

        if options.fresh && work_dir.exists() {
            info!("Discarding existing working directory: {}", work_dir.display());
            std::fs::remove_dir_all(&work_dir)
                .with_context(|| format!("Failed to remove work dir: {:?}", work_dir))?;
        }
        FileManager::ensure_dir(&work_dir)?;

        // Reuse the stored run metadata when resuming so the language pair,
        // prompt and timestamp stay those of the original invocation
        let existing_metadata = self.load_run_metadata(&work_dir)?;
        let resuming = existing_metadata.is_some();
        if resuming {
            info!("Resuming existing run in {}", work_dir.display());
        }

        let extractor = UnitExtractor::new(PandocBackend);
        let units = extractor
            .extract_or_reuse(
                input_file,
                &work_dir,
                existing_metadata.as_ref().map(|m| m.page_count),
            )
            .await?;
        if units.is_empty() {
            return Err(anyhow!("Extraction produced no pages for {:?}", input_file));
        }

        let metadata = match existing_metadata {
            Some(metadata) => {
                if metadata.source_language != self.config.source_language
                    || metadata.target_language != self.config.target_language
                {
                    warn!(
                        "Ignoring requested language pair {} -> {}; resumed run uses {} -> {}",
                        self.config.source_language,
                        self.config.target_language,
                        metadata.source_language,
                        metadata.target_language
                    );
                }
                metadata
            }
            None => {
                let metadata = RunMetadata {
                    input_path: input_file.clone(),
                    source_language: self.config.source_language.clone(),
                    target_language: self.config.target_language.clone(),
                    custom_prompt: options.custom_prompt.clone(),
                    page_count: units.len() as u32,
                    created_at: chrono::Utc::now().to_rfc3339(),
                };
                self.save_run_metadata(&work_dir, &metadata)?;
                metadata
            }
        };

        let base_name = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "book".to_string());
        let document = Document::new(base_name.clone(), work_dir.clone(), units);

        let mut store = CheckpointStore::open(&work_dir)?;

        let oracle = self.build_oracle()?;
        let system_prompt = self.config.translation.build_system_prompt(
            &metadata.source_language,
            &metadata.target_language,
            metadata.custom_prompt.as_deref(),
        );

        let progress_bar = ProgressBar::new(document.unit_count() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let orchestrator = TranslationOrchestrator::new(
            oracle,
            self.config.translation.common.retry_count,
            self.config.translation.common.retry_backoff_ms,
        );

        let pb = progress_bar.clone();
        let summary = orchestrator
            .run(
                &document,
                &mut store,
                &metadata.source_language,
                &metadata.target_language,
                &system_prompt,
                move |done, _total| pb.set_position(done as u64),
            )
            .await?;
        progress_bar.finish_with_message("Translation pass complete");

        if summary.has_failures() {
            for (index, error) in &summary.failures {
                warn!("Unit {} failed: {}", index, error);
            }
        }

        let mode = if options.best_effort {
            ReassemblyMode::BestEffort
        } else {
            ReassemblyMode::Strict
        };
        let merged = Reassembler::new(mode).merge(&document, &store, &metadata)?;

        let (augmented, toc_entries) = TocBuilder::build(&merged);
        let merged_path = work_dir.join(crate::pipeline::reassembler::MERGED_FILE);
        FileManager::write_atomic(&merged_path, &augmented)?;

        let renderer = HtmlRenderer::new(&work_dir);
        let html_path = renderer.render(&merged_path, &base_name, &toc_entries).await?;

        info!(
            "Finished in {}: {} done, {} failed, {} skipped. Output: {}",
            Self::format_duration(start_time.elapsed()),
            summary.done,
            summary.failed,
            summary.skipped,
            html_path.display()
        );

        Ok(summary)
    }

    /// Build the configured translation oracle
    fn build_oracle(&self) -> Result<Box<dyn TranslationOracle>> {
        let translation = &self.config.translation;
        let oracle: Box<dyn TranslationOracle> = match translation.provider {
            OracleProvider::Ollama => Box::new(OllamaOracle::new(
                translation.get_endpoint(),
                translation.get_model(),
                translation.common.temperature,
                translation.get_timeout_secs(),
            )),
            OracleProvider::Anthropic => Box::new(AnthropicOracle::new(
                translation.get_api_key(),
                translation.get_endpoint(),
                translation.get_model(),
                translation.common.temperature,
                translation.get_timeout_secs(),
            )),
        };
        Ok(oracle)
    }

    fn load_run_metadata(&self, work_dir: &Path) -> Result<Option<RunMetadata>> {
        let path = work_dir.join(RUN_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = FileManager::read_to_string(&path)?;
        let metadata: RunMetadata = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse run metadata: {:?}", path))?;
        Ok(Some(metadata))
    }

    fn save_run_metadata(&self, work_dir: &Path, metadata: &RunMetadata) -> Result<()> {
        let json = serde_json::to_string_pretty(metadata)
            .context("Failed to serialize run metadata")?;
        FileManager::write_atomic(work_dir.join(RUN_FILE), &json)?;
        Ok(())
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
