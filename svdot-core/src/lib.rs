//! svdot Core Library
//!
//! Repeat detection, yass alignment, dotplot page composition and the batch
//! driver that turns a variant's chromosome parts into one multi-page artifact.

pub mod types;
pub mod repeats;
pub mod fasta;
pub mod align;
pub mod model;
pub mod canvas;
pub mod dotplot;
pub mod batch;

// Re-export commonly used types and functions
pub use types::{AlignmentRecord, PlotSegment, RepeatInterval, Strand};
pub use repeats::{detect_simple_repeats, RepeatClass};
pub use align::{AlignError, AlignResult, PairAligner};
pub use align::yass::{gap_extend_penalty, YassAligner, YassParams};
pub use model::{Allele, ChromPart, ModelError, PartSegment, Variant};
pub use canvas::{Canvas, CanvasError, CanvasFactory, CanvasResult, LineStyle, PageSetup, Rgb};
pub use dotplot::{DotplotComposer, DotplotStyle, PageSummary};
pub use batch::{probe_capabilities, BatchDriver, BatchOutcome, Capabilities, DotplotError, DotplotResult};

/// Version information for the svdot core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
