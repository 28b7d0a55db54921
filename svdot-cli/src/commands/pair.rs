//! Pair command - a single dotplot page for two FASTA records

use anyhow::{Context, Result};
use std::path::Path;

use svdot_core::fasta::{read_first_sequence, FastaError};
use svdot_core::{
    probe_capabilities, CanvasFactory, ChromPart, DotplotComposer, PageSummary, PairAligner,
};
use svdot_render::{ArtifactFactory, OutputFormat};

use crate::config::Config;
use crate::error::CliError;

pub fn execute(
    config: &Config,
    seq1: &Path,
    seq2: &Path,
    output: &Path,
    format: Option<OutputFormat>,
) -> Result<()> {
    let format = format
        .or_else(|| OutputFormat::from_path(output))
        .unwrap_or(config.render.format);
    log::info!("Output file: {} ({})", output.display(), format);

    let part1 = load_part(seq1)?;
    let part2 = load_part(seq2)?;
    log::info!("{}: {} bp, {}: {} bp", part1.id, part1.len(), part2.id, part2.len());

    let mut export = config.export_config();
    export.provenance_comment = Some(format!("svdot v{}", svdot_core::VERSION));
    let factory = ArtifactFactory::new(format, export);

    let aligner = config.aligner();
    let capabilities = probe_capabilities(&aligner, factory.available());
    if !capabilities.aligner {
        return Err(CliError::external_tool(
            svdot_core::align::yass::YASS_BINARY.to_string(),
            format!("not found at {}", aligner.binary_path().display()),
        )
        .into());
    }
    if !capabilities.plotting {
        return Err(CliError::rendering(format!("{} output is not available in this build", format)).into());
    }

    let composer = DotplotComposer::new(aligner).with_style(config.dotplot_style()?);
    let summary = draw_single(&composer, &factory, output, &part1, &part2)?;
    log::info!(
        "Wrote {} ({} forward, {} reverse alignments)",
        output.display(),
        summary.forward,
        summary.reverse
    );
    Ok(())
}

/// First record of a FASTA/FASTQ file as a whole-sequence part
fn load_part(path: &Path) -> Result<ChromPart> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }
    let record = read_first_sequence(path).map_err(|e| match e {
        FastaError::Io(io) => CliError::io(format!("{}: {}", path.display(), io)),
        other => CliError::invalid_format(format!("{}: {}", path.display(), other)),
    })?;

    let id = if record.id.is_empty() {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "seq".to_string())
    } else {
        record.id
    };
    let sequence = String::from_utf8(record.seq)
        .map_err(|_| CliError::invalid_format(format!("{}: sequence is not ASCII", path.display())))?;
    Ok(ChromPart::whole(id, sequence.to_ascii_uppercase()))
}

pub(crate) fn draw_single<A: PairAligner>(
    composer: &DotplotComposer<A>,
    factory: &dyn CanvasFactory,
    output: &Path,
    part1: &ChromPart,
    part2: &ChromPart,
) -> Result<PageSummary> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut canvas = factory.open(output).map_err(|e| CliError::rendering(e.to_string()))?;
    let drawn = composer.draw(canvas.as_mut(), part1, part2);
    let finished = canvas.finish();

    let summary = drawn.map_err(CliError::from)?;
    finished.map_err(|e| CliError::rendering(e.to_string()))?;
    Ok(summary)
}
