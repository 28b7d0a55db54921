//! SVG canvas
//!
//! Every dotplot page becomes a `<g>` group; groups are stacked vertically
//! and the whole document is written when the canvas is finished.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use svdot_core::{Canvas, CanvasError, CanvasResult, LineStyle, PageSetup};

use crate::frame::{format_bp, PlotFrame, PT_TO_PX};
use crate::{escape_xml, footer_text, ExportConfig};

/// Dash and gap lengths for dashed strokes, in stroke widths
const DASH: (f64, f64) = (6.0, 4.0);

struct SvgPage {
    frame: PlotFrame,
    elements: Vec<String>,
}

/// SVG builder writing all pages into one document
pub struct SvgCanvas {
    path: PathBuf,
    config: ExportConfig,
    pages: Vec<SvgPage>,
    finished: bool,
}

impl SvgCanvas {
    /// Create the output file and an empty document.
    pub fn create<P: AsRef<Path>>(path: P, config: ExportConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::create(&path)?;
        Ok(Self {
            path,
            config,
            pages: Vec::new(),
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn page_mut(&mut self) -> CanvasResult<&mut SvgPage> {
        if self.finished {
            return Err(CanvasError::Finished);
        }
        self.pages.last_mut().ok_or(CanvasError::NoPage)
    }

    fn add_decorations(&self, page: &mut SvgPage, setup: &PageSetup) {
        let frame = &page.frame;
        let font = &self.config.font_family;
        let size = self.config.font_size;
        let els = &mut page.elements;

        els.push(format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            frame.width, frame.height, self.config.background_color
        ));

        // Title
        els.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}px" font-weight="bold" text-anchor="middle">{}</text>"#,
            (frame.left + frame.right) / 2.0,
            frame.top - size as f64,
            font,
            size + 2,
            escape_xml(&setup.title)
        ));

        // Plot box
        els.push(format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="black" stroke-width="1"/>"#,
            frame.left,
            frame.top,
            frame.right - frame.left,
            frame.bottom - frame.top
        ));

        if self.config.show_ticks {
            for w in frame.x_ticks() {
                let x = frame.world_to_page_x(w);
                els.push(format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black" stroke-width="1"/>"#,
                    x, frame.bottom, x, frame.bottom + 5.0
                ));
                els.push(format!(
                    r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}px" text-anchor="middle">{}</text>"#,
                    x,
                    frame.bottom + 6.0 + size as f64,
                    font,
                    size.saturating_sub(2),
                    format_bp(w)
                ));
            }
            for w in frame.y_ticks() {
                let y = frame.world_to_page_y(w);
                els.push(format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black" stroke-width="1"/>"#,
                    frame.left - 5.0, y, frame.left, y
                ));
                els.push(format!(
                    r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}px" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                    frame.left - 8.0,
                    y,
                    font,
                    size.saturating_sub(2),
                    format_bp(w)
                ));
            }
        }

        // Axis labels
        let x_label_y = frame.bottom + 10.0 + 2.0 * size as f64;
        els.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}px" text-anchor="middle">{}</text>"#,
            (frame.left + frame.right) / 2.0,
            x_label_y,
            font,
            size,
            escape_xml(&setup.x_label)
        ));
        let y_label_x = size as f64 + 4.0;
        let y_label_y = (frame.top + frame.bottom) / 2.0;
        els.push(format!(
            r#"<text x="{:.2}" y="{:.2}" transform="rotate(-90 {:.2} {:.2})" font-family="{}" font-size="{}px" text-anchor="middle">{}</text>"#,
            y_label_x,
            y_label_y,
            y_label_x,
            y_label_y,
            font,
            size,
            escape_xml(&setup.y_label)
        ));

        if self.config.show_footer {
            els.push(format!(
                r#"<text x="10" y="{:.2}" font-family="{}" font-size="{}px" fill="gray">{}</text>"#,
                frame.height - 6.0,
                font,
                size.saturating_sub(2),
                escape_xml(&footer_text(&setup.title))
            ));
        }
    }

    fn write_to_file(&self) -> std::io::Result<()> {
        let mut file = BufWriter::new(File::create(&self.path)?);
        let width = self.config.width;
        let height = self.config.height as usize * self.pages.len();

        // SVG header
        writeln!(file, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            file,
            r#"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"#,
            width, height, width, height
        )?;
        if let Some(comment) = &self.config.provenance_comment {
            for line in comment.lines() {
                writeln!(file, "  <!-- {} -->", line.replace("--", "- -"))?;
            }
        }

        for (idx, page) in self.pages.iter().enumerate() {
            writeln!(
                file,
                r#"  <g id="page-{}" transform="translate(0,{})">"#,
                idx + 1,
                idx * self.config.height as usize
            )?;
            for element in &page.elements {
                writeln!(file, "    {}", element)?;
            }
            writeln!(file, "  </g>")?;
        }

        writeln!(file, "</svg>")?;
        file.flush()
    }
}

fn stroke_attributes(style: &LineStyle) -> String {
    let width = style.width * PT_TO_PX;
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{:.2}" stroke-linecap="{}""#,
        style.color.to_hex(),
        width,
        if style.butt_cap { "butt" } else { "round" }
    );
    if style.dashed {
        attrs.push_str(&format!(
            r#" stroke-dasharray="{:.2} {:.2}""#,
            DASH.0 * width.max(1.0),
            DASH.1 * width.max(1.0)
        ));
    }
    attrs
}

fn line_element(from: (f64, f64), to: (f64, f64), style: &LineStyle) -> String {
    format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
        from.0,
        from.1,
        to.0,
        to.1,
        stroke_attributes(style)
    )
}

impl Canvas for SvgCanvas {
    fn begin_page(&mut self, setup: &PageSetup) -> CanvasResult<()> {
        if self.finished {
            return Err(CanvasError::Finished);
        }
        let frame = PlotFrame::new(setup, self.config.width, self.config.height, self.config.font_size);
        let mut page = SvgPage { frame, elements: Vec::new() };
        self.add_decorations(&mut page, setup);
        self.pages.push(page);
        Ok(())
    }

    fn segment(&mut self, from: (f64, f64), to: (f64, f64), style: &LineStyle) -> CanvasResult<()> {
        let page = self.page_mut()?;
        let element = line_element(page.frame.to_page(from), page.frame.to_page(to), style);
        page.elements.push(element);
        Ok(())
    }

    fn vlines(&mut self, xs: &[f64], style: &LineStyle) -> CanvasResult<()> {
        let page = self.page_mut()?;
        for &x in xs {
            let px = page.frame.world_to_page_x(x);
            let element = line_element((px, page.frame.top), (px, page.frame.bottom), style);
            page.elements.push(element);
        }
        Ok(())
    }

    fn hlines(&mut self, ys: &[f64], style: &LineStyle) -> CanvasResult<()> {
        let page = self.page_mut()?;
        for &y in ys {
            let py = page.frame.world_to_page_y(y);
            let element = line_element((page.frame.left, py), (page.frame.right, py), style);
            page.elements.push(element);
        }
        Ok(())
    }

    fn finish(&mut self) -> CanvasResult<()> {
        if self.finished {
            return Err(CanvasError::Finished);
        }
        self.finished = true;
        self.write_to_file()?;
        log::debug!("Wrote {} SVG pages to {}", self.pages.len(), self.path.display());
        Ok(())
    }

    fn pages(&self) -> usize {
        self.pages.len()
    }
}
