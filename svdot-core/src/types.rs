use serde::{Deserialize, Serialize};

use crate::repeats::RepeatClass;

/// Position along one sequence, 0-based.
pub type SeqPos = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Strand flag as written in the yass result table: `f` is forward, anything
/// else is reverse.
impl From<&str> for Strand {
    fn from(flag: &str) -> Self {
        if flag == "f" {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

/// One row of aligner output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub s1_start: SeqPos,
    pub s1_end: SeqPos,
    pub s2_start: SeqPos,
    pub s2_end: SeqPos,
    pub strand: Strand,
}

impl AlignmentRecord {
    pub fn new(s1_start: SeqPos, s1_end: SeqPos, s2_start: SeqPos, s2_end: SeqPos, strand: Strand) -> Self {
        Self { s1_start, s1_end, s2_start, s2_end, strand }
    }

    /// Segment endpoints in plot space (x = first sequence, y = second).
    ///
    /// Reverse-strand matches run along the anti-diagonal, so the first
    /// sequence's coordinates are swapped: `(s1_end, s2_start) -> (s1_start, s2_end)`.
    pub fn plot_segment(&self) -> PlotSegment {
        match self.strand {
            Strand::Forward => PlotSegment {
                x0: self.s1_start as f64,
                y0: self.s2_start as f64,
                x1: self.s1_end as f64,
                y1: self.s2_end as f64,
            },
            Strand::Reverse => PlotSegment {
                x0: self.s1_end as f64,
                y0: self.s2_start as f64,
                x1: self.s1_start as f64,
                y1: self.s2_end as f64,
            },
        }
    }
}

/// A line segment in plot (world) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSegment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PlotSegment {
    pub fn start(&self) -> (f64, f64) {
        (self.x0, self.y0)
    }

    pub fn end(&self) -> (f64, f64) {
        (self.x1, self.y1)
    }
}

/// Half-open `[start, end)` interval covered by a simple tandem repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepeatInterval {
    pub start: usize,
    pub end: usize,
    pub class: RepeatClass,
}

impl RepeatInterval {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of whole repeat units in the interval
    pub fn copies(&self) -> usize {
        self.len() / self.class.unit_len()
    }
}
