//! Check command - capability probe

use anyhow::Result;

use svdot_core::{PairAligner, YassAligner};
use svdot_render::OutputFormat;

use crate::config::Config;

pub fn execute(config: &Config) -> Result<()> {
    let aligner = config.aligner();
    for line in report(&aligner) {
        println!("{}", line);
    }
    Ok(())
}

fn report(aligner: &YassAligner) -> Vec<String> {
    let mut lines = Vec::new();

    match aligner.version() {
        Ok(version) => lines.push(format!(
            "{:<6} ok       {} ({})",
            aligner.name(),
            aligner.binary_path().display(),
            version
        )),
        Err(e) => {
            log::debug!("yass probe failed: {}", e);
            lines.push(format!(
                "{:<6} missing  {} (dotplots will not be generated)",
                aligner.name(),
                aligner.binary_path().display()
            ));
        }
    }

    for format in [OutputFormat::Pdf, OutputFormat::Svg] {
        let status = if format.is_available() { "ok" } else { "missing" };
        lines.push(format!("{:<6} {}", format, status));
    }

    lines
}
