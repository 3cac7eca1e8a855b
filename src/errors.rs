/*!
 * Error types for the bookwai application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while splitting a source document into units.
///
/// Extraction errors are fatal: they abort the run before any translation
/// begins, and the working directory is left in place for inspection.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The source file does not exist
    #[error("source file does not exist: {}", .0.display())]
    MissingSource(PathBuf),

    /// The source file has an extension we cannot split
    #[error("unsupported document format: {} (supported: pdf, docx, epub)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An external conversion tool failed
    #[error("{tool} failed for {}: {message}", .file.display())]
    ToolFailed {
        /// Name of the external tool (pandoc, pdftohtml)
        tool: String,
        /// The file being processed
        file: PathBuf,
        /// Captured stderr or exit status
        message: String,
    },

    /// Filesystem error during extraction
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by the translation oracle.
///
/// Oracle errors are per-unit: they are recorded in the checkpoint ledger,
/// retried up to the configured bound, and then surface as a failed unit
/// without aborting the run.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Error when sending the request failed
    #[error("oracle request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing the oracle response failed
    #[error("failed to parse oracle response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("oracle API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The request exceeded the configured timeout
    #[error("oracle request timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors raised by the checkpoint store.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// The on-disk ledger exists but cannot be trusted.
    ///
    /// Fatal: treating a corrupt ledger as empty would silently re-translate
    /// the whole document and mask the corruption.
    #[error("checkpoint file is corrupt: {}: {message}", .path.display())]
    Corrupt {
        /// Path of the checkpoint file
        path: PathBuf,
        /// Why it failed to parse or validate
        message: String,
    },

    /// Filesystem error while reading or committing the ledger
    #[error("checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while merging translated units into one document.
#[derive(Error, Debug)]
pub enum ReassemblyError {
    /// Strict reassembly found units without a committed translation
    #[error("translation incomplete, missing units: {}", format_indices(.missing))]
    Incomplete {
        /// Indices of units that are not done, ascending
        missing: Vec<u32>,
    },

    /// Filesystem error while writing the merged document
    #[error("reassembly I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_indices(indices: &[u32]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from document extraction
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from the translation oracle
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Error from the checkpoint store
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Error from reassembly
    #[error("reassembly error: {0}")]
    Reassembly(#[from] ReassemblyError),

    /// Error related to configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("file error: {0}")]
    File(String),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
