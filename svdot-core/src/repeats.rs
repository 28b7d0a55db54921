//! Simple tandem repeat detection
//!
//! Finds runs of mono-, di- and tri-nucleotide units. Each class is scanned
//! left to right for non-overlapping, leftmost-greedy runs; classes are
//! scanned independently so their intervals may overlap.

use serde::{Deserialize, Serialize};

use crate::types::RepeatInterval;

const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Repeat-unit length class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RepeatClass {
    /// Single nucleotide repeated at least 10 times
    Mono,
    /// Non-degenerate dinucleotide repeated at least 5 times
    Di,
    /// Non-degenerate trinucleotide repeated at least 3 times
    Tri,
}

impl RepeatClass {
    /// Scan order used by [`detect_simple_repeats`]
    pub const ALL: [RepeatClass; 3] = [RepeatClass::Mono, RepeatClass::Di, RepeatClass::Tri];

    pub fn unit_len(self) -> usize {
        match self {
            RepeatClass::Mono => 1,
            RepeatClass::Di => 2,
            RepeatClass::Tri => 3,
        }
    }

    pub fn min_copies(self) -> usize {
        match self {
            RepeatClass::Mono => 10,
            RepeatClass::Di => 5,
            RepeatClass::Tri => 3,
        }
    }

    /// Shortest span a run of this class can cover
    pub fn min_span(self) -> usize {
        self.unit_len() * self.min_copies()
    }

    /// Whether `unit` is one of this class's repeat units.
    ///
    /// Units are uppercase `ACGT` only. Di- and trinucleotide units made of a
    /// single symbol (`AA`, `CCC`, ...) are degenerate and belong to `Mono`.
    pub fn accepts_unit(self, unit: &[u8]) -> bool {
        if unit.len() != self.unit_len() || !unit.iter().all(|b| NUCLEOTIDES.contains(b)) {
            return false;
        }
        match self {
            RepeatClass::Mono => true,
            RepeatClass::Di | RepeatClass::Tri => unit.iter().any(|&b| b != unit[0]),
        }
    }

    /// All units of the class in lexicographic order (4, 12 and 60 units).
    pub fn units(self) -> Vec<Vec<u8>> {
        let k = self.unit_len();
        let mut units: Vec<Vec<u8>> = vec![Vec::new()];
        for _ in 0..k {
            units = units
                .into_iter()
                .flat_map(|prefix| {
                    NUCLEOTIDES.iter().map(move |&n| {
                        let mut unit = prefix.clone();
                        unit.push(n);
                        unit
                    })
                })
                .collect();
        }
        units.retain(|unit| self.accepts_unit(unit));
        units
    }
}

/// Detect simple tandem repeats in `seq`.
///
/// Returns mono runs, then di runs, then tri runs, each group in scan order.
pub fn detect_simple_repeats(seq: &[u8]) -> Vec<RepeatInterval> {
    RepeatClass::ALL
        .iter()
        .flat_map(|&class| detect_class(seq, class))
        .collect()
}

/// Scan `seq` for runs of a single repeat class.
pub fn detect_class(seq: &[u8], class: RepeatClass) -> Vec<RepeatInterval> {
    let k = class.unit_len();
    let min_span = class.min_span();
    let mut repeats = Vec::new();
    let mut i = 0;

    while i + min_span <= seq.len() {
        let unit = &seq[i..i + k];
        if class.accepts_unit(unit) {
            let mut end = i + k;
            while end + k <= seq.len() && &seq[end..end + k] == unit {
                end += k;
            }
            if end - i >= min_span {
                repeats.push(RepeatInterval { start: i, end, class });
                i = end;
                continue;
            }
        }
        i += 1;
    }

    repeats
}
