/*!
# svdot rendering backends

Concrete [`Canvas`] implementations for dotplot artifacts:

1. **PDF** ([`PdfCanvas`], `pdf` feature): one PDF page per dotplot page
2. **SVG** ([`SvgCanvas`]): all pages stacked vertically in a single SVG

[`ArtifactFactory`] picks the backend from an [`OutputFormat`] and is what the
batch driver opens artifacts through.
*/

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use svdot_core::{Canvas, CanvasError, CanvasFactory, CanvasResult};

pub mod frame;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod svg;

pub use frame::PlotFrame;
#[cfg(feature = "pdf")]
pub use pdf::PdfCanvas;
pub use svg::SvgCanvas;

/// Export configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Page width in pixels
    pub width: u32,
    /// Page height in pixels
    pub height: u32,
    pub font_family: String,
    pub font_size: u32,
    pub background_color: String,
    pub show_ticks: bool,
    pub show_footer: bool,
    pub provenance_comment: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12,
            background_color: "#ffffff".to_string(),
            show_ticks: true,
            show_footer: true,
            provenance_comment: None,
        }
    }
}

/// Artifact file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// Whether the backend for this format was compiled in
    pub fn is_available(self) -> bool {
        match self {
            OutputFormat::Pdf => pdf_available(),
            OutputFormat::Svg => true,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(anyhow::anyhow!("Unsupported output format '{}' (expected pdf or svg)", other)),
        }
    }
}

/// Whether PDF output is compiled in
pub fn pdf_available() -> bool {
    cfg!(feature = "pdf")
}

/// Opens PDF or SVG canvases
#[derive(Debug, Clone)]
pub struct ArtifactFactory {
    format: OutputFormat,
    config: ExportConfig,
}

impl ArtifactFactory {
    pub fn new(format: OutputFormat, config: ExportConfig) -> Self {
        Self { format, config }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    #[cfg(feature = "pdf")]
    fn open_pdf(&self, path: &Path) -> CanvasResult<Box<dyn Canvas>> {
        let canvas = PdfCanvas::create(path, self.config.clone()).map_err(backend_error)?;
        Ok(Box::new(canvas))
    }

    #[cfg(not(feature = "pdf"))]
    fn open_pdf(&self, _path: &Path) -> CanvasResult<Box<dyn Canvas>> {
        Err(CanvasError::Unavailable("PDF export not enabled (compile with 'pdf' feature)".to_string()))
    }
}

impl CanvasFactory for ArtifactFactory {
    fn open(&self, path: &Path) -> CanvasResult<Box<dyn Canvas>> {
        log::debug!("Opening {} artifact {}", self.format, path.display());
        match self.format {
            OutputFormat::Pdf => self.open_pdf(path),
            OutputFormat::Svg => {
                let canvas = SvgCanvas::create(path, self.config.clone()).map_err(backend_error)?;
                Ok(Box::new(canvas))
            }
        }
    }

    fn extension(&self) -> &str {
        self.format.extension()
    }

    fn available(&self) -> bool {
        self.format.is_available()
    }
}

fn backend_error(err: anyhow::Error) -> CanvasError {
    match err.downcast::<std::io::Error>() {
        Ok(io) => CanvasError::Io(io),
        Err(other) => CanvasError::Backend(format!("{:#}", other)),
    }
}

/// Escape text for use inside SVG elements and attributes
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Footer line with version and generation time
pub(crate) fn footer_text(title: &str) -> String {
    format!(
        "svdot v{} | {} | Generated: {}",
        svdot_core::VERSION,
        title,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
}
