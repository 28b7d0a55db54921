//! Configuration handling for the svdot CLI
//!
//! Supports loading configuration from svdot.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use svdot_core::{DotplotStyle, LineStyle, Rgb, YassAligner, YassParams};
use svdot_render::{ExportConfig, OutputFormat};

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aligner: AlignerConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// yass executable, looked up on PATH unless it is a path
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Seed pattern level passed as `-d`
    #[serde(default = "default_seed_level")]
    pub seed_level: u8,

    /// Gap-open penalty; the extension penalty is derived per pair
    #[serde(default = "default_gap_open")]
    pub gap_open: i64,

    /// Indel cost passed as `-E`
    #[serde(default = "default_indel_cost")]
    pub indel_cost: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Color for forward strand alignments
    #[serde(default = "default_color_forward")]
    pub color_forward: String,

    /// Color for reverse strand alignments
    #[serde(default = "default_color_reverse")]
    pub color_reverse: String,

    /// Color for simple repeat markers
    #[serde(default = "default_color_repeat")]
    pub color_repeat: String,

    /// Color for segment boundary gridlines
    #[serde(default = "default_color_grid")]
    pub color_grid: String,

    /// Alignment segment width in points
    #[serde(default = "default_segment_width")]
    pub segment_width: f64,

    /// Repeat marker width in points
    #[serde(default = "default_repeat_width")]
    pub repeat_width: f64,

    /// Gridline width in points
    #[serde(default = "default_grid_width")]
    pub grid_width: f64,

    /// Repeat marker offset as a fraction of the longer sequence
    #[serde(default = "default_repeat_offset_fraction")]
    pub repeat_offset_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Default artifact format
    #[serde(default)]
    pub format: OutputFormat,

    /// Page width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Page height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Draw axis ticks with position labels
    #[serde(default = "default_true")]
    pub show_ticks: bool,

    /// Add a footer with version and generation time
    #[serde(default = "default_true")]
    pub show_footer: bool,
}

// Default value functions
fn default_binary() -> String { "yass".to_string() }
fn default_seed_level() -> u8 { YassParams::default().seed_level }
fn default_gap_open() -> i64 { YassParams::default().gap_open }
fn default_indel_cost() -> i64 { YassParams::default().indel_cost }
fn default_color_forward() -> String { "#0000ff".to_string() }
fn default_color_reverse() -> String { "#ff0000".to_string() }
fn default_color_repeat() -> String { "#ff9900".to_string() }
fn default_color_grid() -> String { "#808080".to_string() }
fn default_segment_width() -> f64 { 1.0 }
fn default_repeat_width() -> f64 { 5.0 }
fn default_grid_width() -> f64 { 0.5 }
fn default_repeat_offset_fraction() -> f64 { svdot_core::dotplot::DEFAULT_REPEAT_OFFSET_FRACTION }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 800 }
fn default_font_size() -> u32 { 12 }
fn default_true() -> bool { true }

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            seed_level: default_seed_level(),
            gap_open: default_gap_open(),
            indel_cost: default_indel_cost(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            color_forward: default_color_forward(),
            color_reverse: default_color_reverse(),
            color_repeat: default_color_repeat(),
            color_grid: default_color_grid(),
            segment_width: default_segment_width(),
            repeat_width: default_repeat_width(),
            grid_width: default_grid_width(),
            repeat_offset_fraction: default_repeat_offset_fraction(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            width: default_width(),
            height: default_height(),
            font_size: default_font_size(),
            show_ticks: true,
            show_footer: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find svdot.toml in current directory
                let default_path = PathBuf::from("svdot.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: svdot.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        let config = Self::default();
        toml::to_string_pretty(&config).context("Failed to serialize default configuration")
    }

    /// yass wrapper configured from `[aligner]`
    pub fn aligner(&self) -> YassAligner {
        let params = YassParams {
            seed_level: self.aligner.seed_level,
            gap_open: self.aligner.gap_open,
            indel_cost: self.aligner.indel_cost,
        };
        let aligner = if self.aligner.binary == svdot_core::align::yass::YASS_BINARY {
            YassAligner::new()
        } else {
            YassAligner::with_binary_path(which_or_path(&self.aligner.binary))
        };
        aligner.with_params(params)
    }

    /// Line styles from `[plot]`
    pub fn dotplot_style(&self) -> CliResult<DotplotStyle> {
        let plot = &self.plot;
        let color = |name: &str, value: &str| -> CliResult<Rgb> {
            value
                .parse::<Rgb>()
                .map_err(|e| CliError::config(format!("plot.{}: {}", name, e)))
        };
        if !(plot.repeat_offset_fraction.is_finite() && plot.repeat_offset_fraction >= 0.0) {
            return Err(CliError::config(format!(
                "plot.repeat_offset_fraction must be a non-negative number, got {}",
                plot.repeat_offset_fraction
            )));
        }

        Ok(DotplotStyle {
            forward: LineStyle::solid(color("color_forward", &plot.color_forward)?, plot.segment_width),
            reverse: LineStyle::solid(color("color_reverse", &plot.color_reverse)?, plot.segment_width),
            repeat: LineStyle::solid(color("color_repeat", &plot.color_repeat)?, plot.repeat_width).with_butt_cap(),
            grid: LineStyle::dashed(color("color_grid", &plot.color_grid)?, plot.grid_width),
            repeat_offset_fraction: plot.repeat_offset_fraction,
        })
    }

    /// Page layout from `[render]`
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            width: self.render.width,
            height: self.render.height,
            font_size: self.render.font_size,
            show_ticks: self.render.show_ticks,
            show_footer: self.render.show_footer,
            ..Default::default()
        }
    }
}

/// Resolve a bare program name on PATH; anything else is used as given
fn which_or_path(binary: &str) -> PathBuf {
    let path = PathBuf::from(binary);
    if path.components().count() > 1 {
        return path;
    }
    svdot_core::align::yass::locate(binary).unwrap_or(path)
}
