//! Plot command - one multi-page dotplot artifact per variant

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use svdot_core::{
    probe_capabilities, BatchDriver, BatchOutcome, CanvasFactory, DotplotComposer, PairAligner, Variant,
};
use svdot_render::{ArtifactFactory, OutputFormat};

use crate::config::Config;
use crate::error::CliError;

pub fn execute(
    config: &Config,
    variant_files: &[PathBuf],
    outdir: &Path,
    format: Option<OutputFormat>,
    quiet: bool,
) -> Result<Vec<BatchOutcome>> {
    let format = format.unwrap_or(config.render.format);
    log::info!("Output directory: {}", outdir.display());
    log::info!("Output format: {}", format);

    let variants = variant_files
        .iter()
        .map(|path| load_variant(path))
        .collect::<Result<Vec<_>>>()?;

    let mut export = config.export_config();
    export.provenance_comment = Some(format!("svdot v{}", svdot_core::VERSION));
    let factory = ArtifactFactory::new(format, export);

    let aligner = config.aligner();
    log::debug!("Using aligner at {}", aligner.binary_path().display());
    let capabilities = probe_capabilities(&aligner, factory.available());
    let composer = DotplotComposer::new(aligner).with_style(config.dotplot_style()?);
    let driver = BatchDriver::new(composer, capabilities);

    let progress = if variants.len() > 1 && !quiet {
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
            .context("Invalid progress bar template")?;
        let pb = ProgressBar::new(variants.len() as u64);
        pb.set_style(style);
        pb
    } else {
        ProgressBar::hidden()
    };

    let outcomes = generate_all(&driver, &variants, outdir, &factory, &progress)?;
    progress.finish_and_clear();

    report(&variants, &outcomes);
    Ok(outcomes)
}

fn load_variant(path: &Path) -> Result<Variant> {
    log::debug!("Loading variant from {}", path.display());
    let variant = Variant::from_json_file(path).map_err(|e| CliError::from_model(path.to_path_buf(), e))?;
    Ok(variant)
}

/// Run the batch for every variant in order, stopping at the first failure
pub(crate) fn generate_all<A: PairAligner>(
    driver: &BatchDriver<A>,
    variants: &[Variant],
    outdir: &Path,
    factory: &dyn CanvasFactory,
    progress: &ProgressBar,
) -> Result<Vec<BatchOutcome>> {
    let mut outcomes = Vec::with_capacity(variants.len());
    for variant in variants {
        progress.set_message(variant.short_name().to_string());
        let outcome = driver
            .generate(variant, outdir, factory)
            .map_err(CliError::from)
            .with_context(|| format!("Dotplots for {} failed", variant.short_name()))?;
        outcomes.push(outcome);
        progress.inc(1);
    }
    Ok(outcomes)
}

fn report(variants: &[Variant], outcomes: &[BatchOutcome]) {
    for (variant, outcome) in variants.iter().zip(outcomes) {
        match outcome {
            BatchOutcome::Disabled => {
                log::info!("{}: dotplots disabled (run 'svdot check')", variant.short_name());
            }
            BatchOutcome::Empty => {
                log::info!("{}: no chromosome parts", variant.short_name());
            }
            BatchOutcome::Written { path, pages, skipped } => {
                if skipped.is_empty() {
                    log::info!("{}: {} pages in {}", variant.short_name(), pages, path.display());
                } else {
                    log::warn!(
                        "{}: {} pages in {}, {} pairs skipped",
                        variant.short_name(),
                        pages,
                        path.display(),
                        skipped.len()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svdot_core::{AlignError, AlignResult, AlignmentRecord, Capabilities, ChromPart, Strand};
    use svdot_render::ExportConfig;

    struct DiagonalAligner;

    impl PairAligner for DiagonalAligner {
        fn align(&self, seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
            let n = seq1.len().min(seq2.len()) as u64;
            Ok(vec![AlignmentRecord::new(1, n, 1, n, Strand::Forward)])
        }

        fn name(&self) -> &'static str {
            "diagonal"
        }
    }

    struct BrokenAligner;

    impl PairAligner for BrokenAligner {
        fn align(&self, _: &[u8], _: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
            Err(AlignError::ToolNotInstalled { tool: "yass".into(), code: Some(127) })
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn variant(name: &str) -> Variant {
        Variant::new(
            name,
            vec![ChromPart::whole("alt_1", "ACGTACGTAA")],
            vec![ChromPart::whole("ref_1", "ACGTTTGTAA")],
        )
    }

    #[test]
    fn test_generate_all_writes_one_artifact_per_variant() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ArtifactFactory::new(OutputFormat::Svg, ExportConfig::default());
        let driver = BatchDriver::new(DotplotComposer::new(DiagonalAligner), Capabilities::enabled());
        let variants = vec![variant("v1"), variant("v2")];

        let outcomes = generate_all(&driver, &variants, dir.path(), &factory, &ProgressBar::hidden()).unwrap();

        assert_eq!(outcomes.len(), 2);
        for (name, outcome) in ["v1", "v2"].iter().zip(&outcomes) {
            match outcome {
                BatchOutcome::Written { path, pages, skipped } => {
                    assert_eq!(path, &dir.path().join(format!("{}.dotplots.svg", name)));
                    assert_eq!(*pages, 3);
                    assert!(skipped.is_empty());
                    assert!(path.exists());
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
    }

    #[test]
    fn test_tool_failure_becomes_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ArtifactFactory::new(OutputFormat::Svg, ExportConfig::default());
        let driver = BatchDriver::new(DotplotComposer::new(BrokenAligner), Capabilities::enabled());

        let err = generate_all(&driver, &[variant("v1")], dir.path(), &factory, &ProgressBar::hidden())
            .unwrap_err();

        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli_err, CliError::ExternalTool { .. }));
        // The artifact is still finished before the error surfaces
        assert!(dir.path().join("v1.dotplots.svg").exists());
    }

    #[test]
    fn test_missing_aligner_disables_plots() {
        let dir = tempfile::tempdir().unwrap();
        let variant_path = dir.path().join("v1.json");
        std::fs::write(
            &variant_path,
            r#"{"short_name": "v1", "alt": [{"id": "a", "seq": "ACGT"}], "ref": []}"#,
        )
        .unwrap();
        let outdir = dir.path().join("plots");

        let mut config = Config::default();
        config.aligner.binary = dir.path().join("no-such-yass").display().to_string();

        let outcomes = execute(&config, &[variant_path], &outdir, Some(OutputFormat::Svg), true).unwrap();

        assert_eq!(outcomes, vec![BatchOutcome::Disabled]);
        assert!(!outdir.exists());
    }

    #[test]
    fn test_missing_variant_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = execute(&Config::default(), &[missing], dir.path(), Some(OutputFormat::Svg), true).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::FileNotFound { .. })));
    }
}
