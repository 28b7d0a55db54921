//! Variant data model
//!
//! A variant carries the chromosome parts of its alternate and reference
//! alleles. Each part is a sequence built from consecutive segments; the
//! segment lengths give the breakpoint positions drawn as gridlines.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid variant: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Allele side of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allele {
    Alt,
    Ref,
}

impl Allele {
    /// Order in which parts are collected for a batch
    pub const ORDER: [Allele; 2] = [Allele::Alt, Allele::Ref];
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allele::Alt => write!(f, "alt"),
            Allele::Ref => write!(f, "ref"),
        }
    }
}

/// One segment of a chromosome part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub length: u64,
}

impl PartSegment {
    pub fn new(length: u64) -> Self {
        Self { name: None, length }
    }

    pub fn named(name: impl Into<String>, length: u64) -> Self {
        Self { name: Some(name.into()), length }
    }
}

/// A named sequence assembled from consecutive segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromPart {
    pub id: String,
    #[serde(rename = "seq")]
    sequence: String,
    #[serde(default)]
    pub segments: Vec<PartSegment>,
}

impl ChromPart {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>, segments: Vec<PartSegment>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
            segments,
        }
    }

    /// A part made of a single segment spanning the whole sequence
    pub fn whole(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        let sequence = sequence.into();
        let length = sequence.len() as u64;
        Self::new(id, sequence, vec![PartSegment::new(length)])
    }

    pub fn seq(&self) -> &[u8] {
        self.sequence.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Sum of the segment lengths, `None` if it does not fit in a `u64`
    pub fn segment_total(&self) -> Option<u64> {
        self.segments.iter().try_fold(0u64, |acc, s| acc.checked_add(s.length))
    }

    /// Positions where one segment ends and the next begins
    pub fn boundaries(&self) -> Vec<u64> {
        let lengths: Vec<u64> = self.segments.iter().map(|s| s.length).collect();
        interior_boundaries(&lengths)
    }
}

/// Cumulative sums of `lengths` without the final total: `[3, 4, 5]` gives `[3, 7]`.
///
/// Sums saturate at `u64::MAX`.
pub fn interior_boundaries(lengths: &[u64]) -> Vec<u64> {
    let mut boundaries = Vec::with_capacity(lengths.len().saturating_sub(1));
    let mut acc = 0u64;
    for &len in lengths.iter().take(lengths.len().saturating_sub(1)) {
        acc = acc.saturating_add(len);
        boundaries.push(acc);
    }
    boundaries
}

/// A structural variant with the chromosome parts of both alleles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub short_name: String,
    #[serde(default)]
    pub alt: Vec<ChromPart>,
    #[serde(rename = "ref", default)]
    pub reference: Vec<ChromPart>,
}

impl Variant {
    pub fn new(short_name: impl Into<String>, alt: Vec<ChromPart>, reference: Vec<ChromPart>) -> Self {
        Self {
            short_name: short_name.into(),
            alt,
            reference,
        }
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn chrom_parts(&self, allele: Allele) -> &[ChromPart] {
        match allele {
            Allele::Alt => &self.alt,
            Allele::Ref => &self.reference,
        }
    }

    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let variant: Variant = serde_json::from_str(json)?;
        variant.validate()?;
        Ok(variant)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check the fields the artifact path and page titles depend on.
    pub fn validate(&self) -> ModelResult<()> {
        if self.short_name.trim().is_empty() {
            return Err(ModelError::Invalid("short_name must not be empty".to_string()));
        }
        if self.short_name.contains(['/', '\\']) {
            return Err(ModelError::Invalid(format!(
                "short_name '{}' must not contain path separators",
                self.short_name
            )));
        }
        for allele in Allele::ORDER {
            for part in self.chrom_parts(allele) {
                if part.id.is_empty() {
                    return Err(ModelError::Invalid(format!("{} part with empty id", allele)));
                }
                if part.segment_total().is_none() {
                    return Err(ModelError::Invalid(format!(
                        "segment lengths of {} part '{}' overflow",
                        allele, part.id
                    )));
                }
            }
        }
        Ok(())
    }
}
