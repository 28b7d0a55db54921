//! Batch dotplot generation
//!
//! Collects the chromosome parts of both alleles of a variant and writes the
//! dotplot of every unordered pair, self-pairs included, into one multi-page
//! artifact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::align::{AlignError, PairAligner};
use crate::canvas::{CanvasError, CanvasFactory};
use crate::dotplot::DotplotComposer;
use crate::model::{Allele, ChromPart, Variant};

#[derive(Debug, Error)]
pub enum DotplotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),
    #[error("Alignment of {part1} against {part2} failed: {source}")]
    PairAlignment {
        part1: String,
        part2: String,
        #[source]
        source: AlignError,
    },
}

pub type DotplotResult<T> = Result<T, DotplotError>;

/// Whether the external pieces a batch needs are present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub aligner: bool,
    pub plotting: bool,
}

impl Capabilities {
    pub fn enabled() -> Self {
        Self { aligner: true, plotting: true }
    }

    pub fn can_generate(&self) -> bool {
        self.aligner && self.plotting
    }
}

/// Probe the aligner and combine it with the plotting backend's availability.
///
/// Logs a single warning when dotplots cannot be generated.
pub fn probe_capabilities(aligner: &dyn PairAligner, plotting_available: bool) -> Capabilities {
    let capabilities = Capabilities {
        aligner: aligner.is_available(),
        plotting: plotting_available,
    };

    if !capabilities.aligner {
        log::warn!("{} is not available, dotplots will not be generated", aligner.name());
    } else if !capabilities.plotting {
        log::warn!("Plotting backend is not available, dotplots will not be generated");
    }

    capabilities
}

/// Result of one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Aligner or plotting backend missing; nothing was written
    Disabled,
    /// The variant has no chromosome parts; nothing was written
    Empty,
    Written {
        path: PathBuf,
        pages: usize,
        /// Pairs whose alignment result could not be parsed
        skipped: Vec<(String, String)>,
    },
}

/// Parts of `alt` then `ref` keyed by id.
///
/// A later part with an already seen id replaces the earlier one in place.
pub fn collect_parts(variant: &Variant) -> Vec<&ChromPart> {
    let mut parts: Vec<&ChromPart> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for allele in Allele::ORDER {
        for part in variant.chrom_parts(allele) {
            match index.get(part.id.as_str()) {
                Some(&pos) => {
                    log::warn!(
                        "Chromosome part id '{}' appears more than once in {}; the {} part replaces the earlier one",
                        part.id,
                        variant.short_name(),
                        allele
                    );
                    parts[pos] = part;
                }
                None => {
                    index.insert(part.id.as_str(), parts.len());
                    parts.push(part);
                }
            }
        }
    }

    parts
}

/// Index pairs `(i, j)` with `i <= j < n`, in row order
pub fn unordered_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect()
}

/// `<outdir>/<short_name>.dotplots.<ext>`
pub fn dotplot_output_path(outdir: &Path, short_name: &str, extension: &str) -> PathBuf {
    outdir.join(format!("{}.dotplots.{}", short_name, extension))
}

/// Drives a [`DotplotComposer`] over all part pairs of a variant
pub struct BatchDriver<A> {
    composer: DotplotComposer<A>,
    capabilities: Capabilities,
}

impl<A: PairAligner> BatchDriver<A> {
    pub fn new(composer: DotplotComposer<A>, capabilities: Capabilities) -> Self {
        Self { composer, capabilities }
    }

    pub fn composer(&self) -> &DotplotComposer<A> {
        &self.composer
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Write the dotplots of `variant` into `outdir`.
    ///
    /// A pair whose result table is malformed is skipped. An aligner failure
    /// stops the batch; the artifact is still finished before the error is
    /// returned.
    pub fn generate(
        &self,
        variant: &Variant,
        outdir: &Path,
        factory: &dyn CanvasFactory,
    ) -> DotplotResult<BatchOutcome> {
        if !self.capabilities.can_generate() {
            log::debug!("Skipping dotplots for {}", variant.short_name());
            return Ok(BatchOutcome::Disabled);
        }

        let parts = collect_parts(variant);
        if parts.is_empty() {
            log::info!("{} has no chromosome parts, no dotplots written", variant.short_name());
            return Ok(BatchOutcome::Empty);
        }

        std::fs::create_dir_all(outdir)?;
        let path = dotplot_output_path(outdir, variant.short_name(), factory.extension());
        let pairs = unordered_pairs(parts.len());
        log::info!(
            "Writing {} dotplots for {} parts to {}",
            pairs.len(),
            parts.len(),
            path.display()
        );

        let mut canvas = factory.open(&path)?;
        let mut skipped = Vec::new();
        let mut failure = None;

        for (i, j) in pairs {
            let (part1, part2) = (parts[i], parts[j]);
            match self.composer.draw(canvas.as_mut(), part1, part2) {
                Ok(_) => {}
                Err(DotplotError::PairAlignment { part1, part2, source }) if !source.is_tool_failure() => {
                    log::warn!("Skipping dotplot {} : {}: {}", part1, part2, source);
                    skipped.push((part1, part2));
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let finished = canvas.finish();
        if let Some(err) = failure {
            if let Err(finish_err) = finished {
                log::error!("Could not finish {}: {}", path.display(), finish_err);
            }
            return Err(err);
        }
        finished?;

        let pages = canvas.pages();
        log::info!("Wrote {} pages to {}", pages, path.display());

        Ok(BatchOutcome::Written { path, pages, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignResult;
    use crate::canvas::RecordingFactory;
    use crate::model::PartSegment;
    use crate::types::AlignmentRecord;

    struct StubAligner {
        available: bool,
    }

    impl PairAligner for StubAligner {
        fn align(&self, _seq1: &[u8], _seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "stub"
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn variant(alt: &[&str], reference: &[&str]) -> Variant {
        let parts = |ids: &[&str]| -> Vec<ChromPart> {
            ids.iter().map(|id| ChromPart::new(*id, "ACGT", vec![PartSegment::new(4)])).collect()
        };
        Variant::new("v1", parts(alt), parts(reference))
    }

    #[test]
    fn test_unordered_pairs() {
        assert_eq!(unordered_pairs(3), vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]);
        assert_eq!(unordered_pairs(1), vec![(0, 0)]);
        assert!(unordered_pairs(0).is_empty());
        // C(n,2) + n
        assert_eq!(unordered_pairs(7).len(), 21 + 7);
    }

    #[test]
    fn test_collect_parts_alt_then_ref() {
        let v = variant(&["a1", "a2"], &["r1"]);
        let ids: Vec<&str> = collect_parts(&v).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "r1"]);
    }

    #[test]
    fn test_duplicate_id_keeps_first_position_last_value() {
        let mut v = variant(&["x", "a2"], &[]);
        v.reference.push(ChromPart::new("x", "TTTT", vec![]));

        let parts = collect_parts(&v);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].id, "x");
        assert_eq!(parts[0].seq(), b"TTTT");
        assert_eq!(parts[1].id, "a2");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            dotplot_output_path(Path::new("/out"), "del_1", "pdf"),
            PathBuf::from("/out/del_1.dotplots.pdf")
        );
    }

    #[test]
    fn test_capabilities() {
        assert!(Capabilities::enabled().can_generate());
        assert!(!Capabilities { aligner: false, plotting: true }.can_generate());
        assert!(!Capabilities { aligner: true, plotting: false }.can_generate());
    }

    #[test]
    fn test_probe_without_plotting_backend() {
        let capabilities = probe_capabilities(&StubAligner { available: true }, false);
        assert!(capabilities.aligner);
        assert!(!capabilities.plotting);
        assert!(!capabilities.can_generate());

        let capabilities = probe_capabilities(&StubAligner { available: false }, true);
        assert!(!capabilities.aligner);
        assert!(!capabilities.can_generate());

        assert!(probe_capabilities(&StubAligner { available: true }, true).can_generate());
    }

    #[test]
    fn test_missing_plotting_backend_writes_nothing() {
        let aligner = StubAligner { available: true };
        let capabilities = probe_capabilities(&aligner, false);
        let driver = BatchDriver::new(DotplotComposer::new(aligner), capabilities);
        let factory = RecordingFactory::new("pdf");

        let outcome = driver.generate(&variant(&["a"], &["r"]), Path::new("/nonexistent"), &factory).unwrap();

        assert_eq!(outcome, BatchOutcome::Disabled);
        assert!(factory.opened().is_empty());
    }
}
