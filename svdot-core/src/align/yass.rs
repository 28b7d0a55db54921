//! yass wrapper
//!
//! Runs the yass binary on a pair of sequences through temporary FASTA files
//! and parses its tabular output into [`AlignmentRecord`]s.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::result::parse_result_file;
use super::{AlignError, AlignResult, AlignmentRecord, PairAligner};
use crate::fasta;

/// Name of the yass executable looked up on `PATH`
pub const YASS_BINARY: &str = "yass";

/// Fixed yass scoring parameters. The gap-extension penalty is not part of
/// this struct; it is derived per pair by [`gap_extend_penalty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YassParams {
    /// `-d` level
    pub seed_level: u8,
    /// Gap-open penalty, first half of `-G`
    pub gap_open: i64,
    /// Indel extension cost, `-E`
    pub indel_cost: i64,
}

impl Default for YassParams {
    fn default() -> Self {
        Self {
            seed_level: 3,
            gap_open: -50,
            indel_cost: 10,
        }
    }
}

/// Gap-extension penalty for a pair of sequences.
///
/// `-floor(max(len1, len2) / 2 / 10 * 5)`: half the longer sequence, per 10 nt
/// of insertion, times the match bonus. Evaluated in f64 in exactly this
/// order; alignment sensitivity depends on it.
pub fn gap_extend_penalty(len1: usize, len2: usize) -> i64 {
    let longest = len1.max(len2) as f64;
    -((longest / 2.0 / 10.0 * 5.0).floor() as i64)
}

/// Look `program` up on `PATH`
pub fn locate(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// yass alignment engine
pub struct YassAligner {
    binary_path: PathBuf,
    params: YassParams,
}

impl YassAligner {
    /// Use the yass found on `PATH`, or a bare `yass` if lookup fails
    pub fn new() -> Self {
        let binary_path = locate(YASS_BINARY).unwrap_or_else(|| PathBuf::from(YASS_BINARY));
        Self {
            binary_path,
            params: YassParams::default(),
        }
    }

    /// Create aligner with custom binary path
    pub fn with_binary_path<P: Into<PathBuf>>(binary_path: P) -> Self {
        Self {
            binary_path: binary_path.into(),
            params: YassParams::default(),
        }
    }

    pub fn with_params(mut self, params: YassParams) -> Self {
        self.params = params;
        self
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    pub fn params(&self) -> &YassParams {
        &self.params
    }

    /// Query `yass --version` and return whatever it printed.
    pub fn version(&self) -> AlignResult<String> {
        let output = Command::new(&self.binary_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AlignError::Spawn {
                tool: YASS_BINARY.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(AlignError::ToolNotInstalled {
                tool: YASS_BINARY.to_string(),
                code: output.status.code(),
            });
        }

        let mut text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            text = String::from_utf8_lossy(&output.stderr).trim().to_string();
        }
        Ok(text.lines().next().unwrap_or_default().to_string())
    }

    /// Build the yass argument list
    pub fn build_command_args(
        &self,
        gap_extend: i64,
        result_path: &Path,
        fasta1: &Path,
        fasta2: &Path,
    ) -> Vec<OsString> {
        vec![
            "-d".into(),
            self.params.seed_level.to_string().into(),
            "-G".into(),
            format!("{},{}", self.params.gap_open, gap_extend).into(),
            "-E".into(),
            self.params.indel_cost.to_string().into(),
            "-o".into(),
            result_path.as_os_str().to_owned(),
            fasta1.as_os_str().to_owned(),
            fasta2.as_os_str().to_owned(),
        ]
    }
}

impl Default for YassAligner {
    fn default() -> Self {
        Self::new()
    }
}

impl PairAligner for YassAligner {
    fn align(&self, seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
        // Removed on drop, whichever way this function returns
        let workdir = tempfile::Builder::new().prefix("svdot-yass-").tempdir()?;

        let fasta1 = workdir.path().join("seq0.fa");
        let fasta2 = workdir.path().join("seq1.fa");
        fasta::write_single_record(&fasta1, "seq", seq1)?;
        fasta::write_single_record(&fasta2, "seq", seq2)?;

        let result_path = workdir.path().join("result.txt");
        let gap_extend = gap_extend_penalty(seq1.len(), seq2.len());
        let args = self.build_command_args(gap_extend, &result_path, &fasta1, &fasta2);

        log::debug!("Running yass: {} {:?}", self.binary_path.display(), args);

        let output = Command::new(&self.binary_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| AlignError::Spawn {
                tool: YASS_BINARY.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(AlignError::ToolNotInstalled {
                tool: YASS_BINARY.to_string(),
                code: output.status.code(),
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if let Some(first_line) = stderr.lines().next() {
            if first_line.contains("Error") {
                log::error!("Error running yass: '{}'", first_line);
                return Err(AlignError::ToolReported {
                    tool: YASS_BINARY.to_string(),
                    message: first_line.to_string(),
                });
            }
        }

        let records = parse_result_file(&result_path)?;
        log::debug!(
            "yass reported {} alignments ({} x {} bp, gap extend {})",
            records.len(),
            seq1.len(),
            seq2.len(),
            gap_extend
        );
        Ok(records)
    }

    fn name(&self) -> &'static str {
        YASS_BINARY
    }

    fn is_available(&self) -> bool {
        self.version().is_ok()
    }
}
