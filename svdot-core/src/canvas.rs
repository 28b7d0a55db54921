//! Drawing surface used by the dotplot composer
//!
//! A canvas is a multi-page document written one page at a time. Coordinates
//! passed to it are world coordinates (sequence positions); each backend maps
//! them onto its page using the limits given in [`PageSetup`].

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No page has been started")]
    NoPage,
    #[error("Document already finished")]
    Finished,
    #[error("Invalid color '{0}'")]
    InvalidColor(String),
    #[error("Plotting backend unavailable: {0}")]
    Unavailable(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type CanvasResult<T> = Result<T, CanvasError>;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    pub const ORANGE: Rgb = Rgb::new(255, 153, 0);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Components scaled to `0.0..=1.0`
    pub fn to_unit(self) -> (f64, f64, f64) {
        (self.r as f64 / 255.0, self.g as f64 / 255.0, self.b as f64 / 255.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parses `#rrggbb`, `rrggbb` or one of a few color names.
impl FromStr for Rgb {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "blue" => return Ok(Rgb::BLUE),
            "red" => return Ok(Rgb::RED),
            "gray" | "grey" => return Ok(Rgb::GRAY),
            "orange" => return Ok(Rgb::ORANGE),
            "black" => return Ok(Rgb::BLACK),
            _ => {}
        }

        let hex = trimmed.trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CanvasError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| CanvasError::InvalidColor(s.to_string()))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Stroke style for segments and gridlines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    /// Stroke width in points
    pub width: f64,
    pub dashed: bool,
    pub butt_cap: bool,
}

impl LineStyle {
    pub fn solid(color: Rgb, width: f64) -> Self {
        Self { color, width, dashed: false, butt_cap: false }
    }

    pub fn dashed(color: Rgb, width: f64) -> Self {
        Self { color, width, dashed: true, butt_cap: false }
    }

    pub fn with_butt_cap(mut self) -> Self {
        self.butt_cap = true;
        self
    }
}

/// Axes and labels of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
}

/// A multi-page drawing surface
pub trait Canvas {
    /// Start a new page; all following draws land on it.
    fn begin_page(&mut self, setup: &PageSetup) -> CanvasResult<()>;

    /// Straight line between two world points
    fn segment(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle) -> CanvasResult<()>;

    /// Vertical lines spanning the full y range at each x
    fn vlines(&mut self, xs: &[f64], style: &LineStyle) -> CanvasResult<()>;

    /// Horizontal lines spanning the full x range at each y
    fn hlines(&mut self, ys: &[f64], style: &LineStyle) -> CanvasResult<()>;

    /// Flush the document. No draws are accepted afterwards.
    fn finish(&mut self) -> CanvasResult<()>;

    /// Number of pages started so far
    fn pages(&self) -> usize;
}

/// Opens canvases for a given output path
pub trait CanvasFactory {
    fn open(&self, path: &Path) -> CanvasResult<Box<dyn Canvas>>;

    /// File extension of the documents this factory writes, without the dot
    fn extension(&self) -> &str;

    /// Whether the backend is compiled in and usable
    fn available(&self) -> bool {
        true
    }
}

/// One call made on a [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginPage(PageSetup),
    Segment { from: (f64, f64), to: (f64, f64), style: LineStyle },
    VLines { xs: Vec<f64>, style: LineStyle },
    HLines { ys: Vec<f64>, style: LineStyle },
    Finish,
}

#[derive(Debug, Default)]
struct Recording {
    ops: Vec<DrawOp>,
    pages: usize,
    page_open: bool,
    finished: bool,
}

/// In-memory canvas that logs every draw call in order.
///
/// Clones share the same log, so a test can keep one handle while the code
/// under test owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.inner.borrow().ops.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.borrow().finished
    }

    /// Operations grouped by page, without the trailing `Finish`
    pub fn page_ops(&self) -> Vec<Vec<DrawOp>> {
        let mut pages: Vec<Vec<DrawOp>> = Vec::new();
        for op in self.inner.borrow().ops.iter() {
            match op {
                DrawOp::BeginPage(_) => pages.push(vec![op.clone()]),
                DrawOp::Finish => {}
                _ => {
                    if let Some(page) = pages.last_mut() {
                        page.push(op.clone());
                    }
                }
            }
        }
        pages
    }

    fn record(&self, op: DrawOp) -> CanvasResult<()> {
        let mut rec = self.inner.borrow_mut();
        if rec.finished {
            return Err(CanvasError::Finished);
        }
        match &op {
            DrawOp::BeginPage(_) => {
                rec.pages += 1;
                rec.page_open = true;
            }
            DrawOp::Finish => rec.finished = true,
            _ if !rec.page_open => return Err(CanvasError::NoPage),
            _ => {}
        }
        rec.ops.push(op);
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn begin_page(&mut self, setup: &PageSetup) -> CanvasResult<()> {
        self.record(DrawOp::BeginPage(setup.clone()))
    }

    fn segment(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle) -> CanvasResult<()> {
        self.record(DrawOp::Segment { from, to, style: *style })
    }

    fn vlines(&mut self, xs: &[f64], style: &LineStyle) -> CanvasResult<()> {
        self.record(DrawOp::VLines { xs: xs.to_vec(), style: *style })
    }

    fn hlines(&mut self, ys: &[f64], style: &LineStyle) -> CanvasResult<()> {
        self.record(DrawOp::HLines { ys: ys.to_vec(), style: *style })
    }

    fn finish(&mut self) -> CanvasResult<()> {
        self.record(DrawOp::Finish)
    }

    fn pages(&self) -> usize {
        self.inner.borrow().pages
    }
}

/// Factory handing out one shared [`RecordingCanvas`] and remembering the
/// paths it was asked to open. Nothing is written to disk.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    canvas: RecordingCanvas,
    opened: RefCell<Vec<PathBuf>>,
    extension: String,
}

impl RecordingFactory {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            canvas: RecordingCanvas::new(),
            opened: RefCell::new(Vec::new()),
            extension: extension.into(),
        }
    }

    pub fn canvas(&self) -> &RecordingCanvas {
        &self.canvas
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }
}

impl CanvasFactory for RecordingFactory {
    fn open(&self, path: &Path) -> CanvasResult<Box<dyn Canvas>> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(Box::new(self.canvas.clone()))
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}
