//! Parser for the yass tabular result file
//!
//! Lines starting with `#` are comments. Every other non-blank line carries at
//! least seven whitespace-separated fields: four integer coordinates (first
//! sequence start/end, second sequence start/end), two fields this parser
//! ignores, and the strand flag.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{AlignError, AlignResult};
use crate::types::{AlignmentRecord, Strand};

/// Minimum number of fields on a data line
pub const MIN_FIELDS: usize = 7;

/// Index of the strand flag field
pub const STRAND_FIELD: usize = 6;

/// Parse one line of the result table.
///
/// Returns `Ok(None)` for comments and blank lines. `line_no` is 1-based and
/// only used in error messages.
pub fn parse_result_line(line: &str, line_no: usize) -> AlignResult<Option<AlignmentRecord>> {
    if line.starts_with('#') || line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return Err(AlignError::MalformedResult {
            line: line_no,
            message: format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
        });
    }

    let coord = |idx: usize| -> AlignResult<u64> {
        fields[idx].parse::<u64>().map_err(|_| AlignError::MalformedResult {
            line: line_no,
            message: format!("field {} is not an integer coordinate: '{}'", idx, fields[idx]),
        })
    };

    let strand = Strand::from(fields[STRAND_FIELD]);

    Ok(Some(AlignmentRecord::new(coord(0)?, coord(1)?, coord(2)?, coord(3)?, strand)))
}

/// Parse a whole result table from any reader.
pub fn parse_results<R: BufRead>(reader: R) -> AlignResult<Vec<AlignmentRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(record) = parse_result_line(&line, idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Parse the result table written by the aligner at `path`.
pub fn parse_result_file<P: AsRef<Path>>(path: P) -> AlignResult<Vec<AlignmentRecord>> {
    let file = File::open(path)?;
    parse_results(BufReader::new(file))
}
