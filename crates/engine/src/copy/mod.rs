//! Content copy with optional compression and metadata preservation.

mod outcome;
mod pipeline;

pub use outcome::{CopyFailure, FileOutcome, StepWarning};
pub use pipeline::CopyPipeline;

/// Size of the read buffer used when streaming through a compressor.
pub const CHUNK_SIZE: usize = 9_216_000;
