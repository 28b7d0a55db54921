//! Pairwise alignment adapters
//!
//! Alignment itself is delegated to an external seed-and-extend aligner; this
//! module defines the seam ([`PairAligner`]) and the error taxonomy shared by
//! the adapters.

pub use crate::types::{AlignmentRecord, Strand};

pub mod result;
pub mod yass;

/// Result type for alignment operations
pub type AlignResult<T> = Result<T, AlignError>;

/// Errors that can occur while running the external aligner
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start {tool}: {message}")]
    Spawn { tool: String, message: String },

    #[error("Check that {tool} is installed correctly (exit code: {code:?})")]
    ToolNotInstalled { tool: String, code: Option<i32> },

    #[error("Error running {tool}: '{message}'")]
    ToolReported { tool: String, message: String },

    #[error("Malformed result line {line}: {message}")]
    MalformedResult { line: usize, message: String },
}

impl From<crate::fasta::FastaError> for AlignError {
    fn from(err: crate::fasta::FastaError) -> Self {
        match err {
            crate::fasta::FastaError::Io(e) => AlignError::Io(e),
            other => AlignError::Io(std::io::Error::new(std::io::ErrorKind::Other, other.to_string())),
        }
    }
}

impl AlignError {
    /// Whether this failure means the aligner itself is broken, as opposed to
    /// a single result table being unreadable.
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            AlignError::Spawn { .. } | AlignError::ToolNotInstalled { .. } | AlignError::ToolReported { .. }
        )
    }
}

/// Trait for pairwise aligners
pub trait PairAligner {
    /// Align `seq1` against `seq2` and return the local alignments found
    fn align(&self, seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>>;

    /// Get the name/identifier of this aligner
    fn name(&self) -> &'static str;

    /// Check if the aligner can be run (e.g., external tool installed)
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: PairAligner + ?Sized> PairAligner for &T {
    fn align(&self, seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
        (**self).align(seq1, seq2)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
