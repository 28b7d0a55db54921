//! PDF canvas (printpdf)
//!
//! One PDF page per dotplot page. The document is kept in memory and saved
//! when the canvas is finished.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Result;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, LineCapStyle, LineDashPattern, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point,
};
use svdot_core::{Canvas, CanvasError, CanvasResult, LineStyle, PageSetup, Rgb};

use crate::frame::{format_bp, PlotFrame, PX_TO_MM};
use crate::{footer_text, ExportConfig};

/// PDF builder for dotplot pages
pub struct PdfCanvas {
    path: PathBuf,
    config: ExportConfig,
    doc: Option<PdfDocumentReference>,
    font: Option<IndirectFontRef>,
    current_page: Option<PdfPageIndex>,
    current_layer: Option<PdfLayerIndex>,
    frame: Option<PlotFrame>,
    pages: usize,
}

impl PdfCanvas {
    /// Create the output file and an empty document.
    pub fn create<P: AsRef<Path>>(path: P, config: ExportConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::create(&path)?;

        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "svdot dotplots".to_string());
        let doc = PdfDocument::empty(title);
        // Labels are skipped if the built-in font cannot be registered
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).ok();

        Ok(Self {
            path,
            config,
            doc: Some(doc),
            font,
            current_page: None,
            current_layer: None,
            frame: None,
            pages: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn layer(&self) -> CanvasResult<PdfLayerReference> {
        let doc = self.doc.as_ref().ok_or(CanvasError::Finished)?;
        let page = self.current_page.ok_or(CanvasError::NoPage)?;
        let layer = self.current_layer.ok_or(CanvasError::NoPage)?;
        Ok(doc.get_page(page).get_layer(layer))
    }

    fn frame(&self) -> CanvasResult<&PlotFrame> {
        if self.doc.is_none() {
            return Err(CanvasError::Finished);
        }
        self.frame.as_ref().ok_or(CanvasError::NoPage)
    }

    /// Page pixels (top-left origin) to PDF millimetres (bottom-left origin)
    fn pdf_mm(&self, page_px: (f64, f64)) -> (Mm, Mm) {
        let height = self.config.height as f64;
        (Mm(page_px.0 * PX_TO_MM), Mm((height - page_px.1) * PX_TO_MM))
    }

    fn pdf_point(&self, page_px: (f64, f64)) -> Point {
        let (x, y) = self.pdf_mm(page_px);
        Point::new(x, y)
    }

    fn stroke(&self, layer: &PdfLayerReference, from_px: (f64, f64), to_px: (f64, f64), style: &LineStyle) {
        apply_style(layer, style);
        layer.add_shape(Line {
            points: vec![(self.pdf_point(from_px), false), (self.pdf_point(to_px), false)],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }

    fn text(&self, layer: &PdfLayerReference, text: &str, size: f64, page_px: (f64, f64)) {
        if let Some(font) = self.font.as_ref() {
            let (x, y) = self.pdf_mm(page_px);
            layer.use_text(text, size, x, y, font);
        }
    }

    fn add_decorations(&self, layer: &PdfLayerReference, frame: &PlotFrame, setup: &PageSetup) {
        let size = self.config.font_size as f64;
        let axis = LineStyle::solid(Rgb::BLACK, 0.75);

        // Plot box
        let corners = [
            (frame.left, frame.top),
            (frame.right, frame.top),
            (frame.right, frame.bottom),
            (frame.left, frame.bottom),
        ];
        for i in 0..corners.len() {
            self.stroke(layer, corners[i], corners[(i + 1) % corners.len()], &axis);
        }

        let approx_width = |text: &str, size: f64| text.chars().count() as f64 * size * 0.5;

        let title_size = size + 2.0;
        self.text(
            layer,
            &setup.title,
            title_size,
            ((frame.left + frame.right - approx_width(&setup.title, title_size)) / 2.0, frame.top - size),
        );

        if self.config.show_ticks {
            let tick_size = (size - 2.0).max(1.0);
            for w in frame.x_ticks() {
                let x = frame.world_to_page_x(w);
                self.stroke(layer, (x, frame.bottom), (x, frame.bottom + 5.0), &axis);
                let label = format_bp(w);
                self.text(
                    layer,
                    &label,
                    tick_size,
                    (x - approx_width(&label, tick_size) / 2.0, frame.bottom + 6.0 + size),
                );
            }
            for w in frame.y_ticks() {
                let y = frame.world_to_page_y(w);
                self.stroke(layer, (frame.left - 5.0, y), (frame.left, y), &axis);
                let label = format_bp(w);
                self.text(
                    layer,
                    &label,
                    tick_size,
                    (frame.left - 8.0 - approx_width(&label, tick_size), y + tick_size / 3.0),
                );
            }
        }

        // Axis labels; the y label sits above the plot box
        self.text(
            layer,
            &setup.x_label,
            size,
            (
                (frame.left + frame.right - approx_width(&setup.x_label, size)) / 2.0,
                frame.bottom + 10.0 + 2.0 * size,
            ),
        );
        self.text(layer, &setup.y_label, size, (10.0, frame.top - 4.0));

        if self.config.show_footer {
            self.text(layer, &footer_text(&setup.title), (size - 2.0).max(1.0), (10.0, frame.height - 6.0));
        }
    }
}

fn apply_style(layer: &PdfLayerReference, style: &LineStyle) {
    let (r, g, b) = style.color.to_unit();
    layer.set_outline_color(Color::Rgb(printpdf::Rgb::new(r, g, b, None)));
    layer.set_outline_thickness(style.width);
    layer.set_line_cap_style(if style.butt_cap { LineCapStyle::Butt } else { LineCapStyle::Round });
    let pattern = if style.dashed {
        let unit = style.width.max(1.0);
        LineDashPattern::new(
            0,
            Some((6.0 * unit).round() as i64),
            Some((4.0 * unit).round() as i64),
            None,
            None,
            None,
            None,
        )
    } else {
        LineDashPattern::new(0, None, None, None, None, None, None)
    };
    layer.set_line_dash_pattern(pattern);
}

impl Canvas for PdfCanvas {
    fn begin_page(&mut self, setup: &PageSetup) -> CanvasResult<()> {
        let doc = self.doc.as_ref().ok_or(CanvasError::Finished)?;
        let (page_index, layer_index) = doc.add_page(
            Mm(self.config.width as f64 * PX_TO_MM),
            Mm(self.config.height as f64 * PX_TO_MM),
            "Layer 1",
        );
        self.current_page = Some(page_index);
        self.current_layer = Some(layer_index);
        self.pages += 1;

        let frame = PlotFrame::new(setup, self.config.width, self.config.height, self.config.font_size);
        let layer = self.layer()?;
        self.add_decorations(&layer, &frame, setup);
        self.frame = Some(frame);
        Ok(())
    }

    fn segment(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle) -> CanvasResult<()> {
        let frame = self.frame()?;
        let layer = self.layer()?;
        self.stroke(&layer, frame.to_page(from), frame.to_page(to), style);
        Ok(())
    }

    fn vlines(&mut self, xs: &[f64], style: &LineStyle) -> CanvasResult<()> {
        let frame = self.frame()?;
        let layer = self.layer()?;
        for &x in xs {
            let px = frame.world_to_page_x(x);
            self.stroke(&layer, (px, frame.top), (px, frame.bottom), style);
        }
        Ok(())
    }

    fn hlines(&mut self, ys: &[f64], style: &LineStyle) -> CanvasResult<()> {
        let frame = self.frame()?;
        let layer = self.layer()?;
        for &y in ys {
            let py = frame.world_to_page_y(y);
            self.stroke(&layer, (frame.left, py), (frame.right, py), style);
        }
        Ok(())
    }

    fn finish(&mut self) -> CanvasResult<()> {
        let doc = self.doc.take().ok_or(CanvasError::Finished)?;
        self.current_page = None;
        self.current_layer = None;
        self.frame = None;

        let mut out = BufWriter::new(File::create(&self.path)?);
        doc.save(&mut out).map_err(|e| CanvasError::Backend(e.to_string()))?;
        log::debug!("Wrote {} PDF pages to {}", self.pages, self.path.display());
        Ok(())
    }

    fn pages(&self) -> usize {
        self.pages
    }
}
