/*!
 * # bookwai - AI ebook translation with durable resume
 *
 * A Rust library for translating ebooks (PDF, DOCX, EPUB) into styled HTML
 * using AI providers.
 *
 * ## Features
 *
 * - Split a source document into ordered per-page translation units
 * - Translate units using various AI providers:
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Durable checkpointing: interrupted runs resume without re-translating
 *   finished pages or re-ordering output
 * - Deterministic reassembly with a generated table of contents
 * - Styled standalone HTML output
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Document, unit and run-metadata data model
 * - `extractor`: Document splitting (pandoc / pdftohtml backend)
 * - `checkpoint`: Durable per-unit translation ledger
 * - `pipeline`: Translation orchestration, reassembly and ToC building
 * - `render`: Markdown to styled HTML rendering
 * - `providers`: Clients for the translation oracles:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::mock`: Deterministic oracles for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod checkpoint;
pub mod document;
pub mod errors;
pub mod extractor;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod render;

// Re-export main types for easier usage
pub use app_config::Config;
pub use checkpoint::{CheckpointRecord, CheckpointStore};
pub use document::{Document, Unit, UnitStatus};
pub use errors::{AppError, CheckpointError, ExtractionError, OracleError, ReassemblyError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use pipeline::{Reassembler, ReassemblyMode, RunSummary, TocBuilder, TranslationOrchestrator};
