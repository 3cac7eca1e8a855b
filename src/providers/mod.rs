/*!
 * Translation oracle implementations.
 *
 * This module contains the oracle capability interface and its client
 * implementations:
 * - Ollama: local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: deterministic oracles for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::OracleError;

/// One translation request to the oracle
#[derive(Debug, Clone)]
pub struct OracleRequest {
    /// Source-language text of a single unit
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Fully rendered system prompt for this run
    pub system_prompt: String,
}

/// Capability interface for the external translation oracle.
///
/// The orchestrator treats the oracle as a black box: text in, translated
/// text out, typed error on failure. Implementations must be object-safe so
/// the provider is selected at runtime from configuration.
#[async_trait]
pub trait TranslationOracle: Send + Sync + Debug {
    /// Translate one unit of text
    async fn translate(&self, request: &OracleRequest) -> Result<String, OracleError>;

    /// Provider name for log lines
    fn name(&self) -> &str;
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
