/*!
 * Translation pipeline stages.
 *
 * - `orchestrator`: drives the oracle over pending units with checkpointing
 * - `reassembler`: merges translated units into one markdown document
 * - `toc`: builds the table of contents from the merged document
 */

pub mod orchestrator;
pub mod reassembler;
pub mod toc;

pub use orchestrator::{RunSummary, TranslationOrchestrator};
pub use reassembler::{Reassembler, ReassemblyMode};
pub use toc::{TocBuilder, TocEntry};
