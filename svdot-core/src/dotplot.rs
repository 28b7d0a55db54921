//! Dotplot page composition
//!
//! Draws one page per pair of chromosome parts. Draw order is the z-order:
//! boundary gridlines, then alignment segments, then repeat markers.

use crate::align::PairAligner;
use crate::batch::{DotplotError, DotplotResult};
use crate::canvas::{Canvas, LineStyle, PageSetup, Rgb};
use crate::model::ChromPart;
use crate::repeats::detect_simple_repeats;
use crate::types::Strand;

/// Fraction of the longer sequence at which repeat markers are drawn
pub const DEFAULT_REPEAT_OFFSET_FRACTION: f64 = 0.01;

/// Line styles for a dotplot page
#[derive(Debug, Clone, PartialEq)]
pub struct DotplotStyle {
    pub forward: LineStyle,
    pub reverse: LineStyle,
    pub repeat: LineStyle,
    pub grid: LineStyle,
    pub repeat_offset_fraction: f64,
}

impl Default for DotplotStyle {
    fn default() -> Self {
        Self {
            forward: LineStyle::solid(Rgb::BLUE, 1.0),
            reverse: LineStyle::solid(Rgb::RED, 1.0),
            repeat: LineStyle::solid(Rgb::ORANGE, 5.0).with_butt_cap(),
            grid: LineStyle::dashed(Rgb::GRAY, 0.5),
            repeat_offset_fraction: DEFAULT_REPEAT_OFFSET_FRACTION,
        }
    }
}

impl DotplotStyle {
    pub fn for_strand(&self, strand: Strand) -> &LineStyle {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }
}

/// What was drawn on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub part1: String,
    pub part2: String,
    pub forward: usize,
    pub reverse: usize,
    pub repeats1: usize,
    pub repeats2: usize,
}

impl PageSummary {
    pub fn alignments(&self) -> usize {
        self.forward + self.reverse
    }
}

/// Page setup for a pair of parts: `id1 : id2`, limits `[0, len]`.
pub fn page_setup(part1: &ChromPart, part2: &ChromPart) -> PageSetup {
    PageSetup {
        title: format!("{} : {}", part1.id, part2.id),
        x_label: format!("Position in {}", part1.id),
        y_label: format!("Position in {}", part2.id),
        x_limits: (0.0, part1.len() as f64),
        y_limits: (0.0, part2.len() as f64),
    }
}

/// Composes dotplot pages from an aligner and a style
pub struct DotplotComposer<A> {
    aligner: A,
    style: DotplotStyle,
}

impl<A: PairAligner> DotplotComposer<A> {
    pub fn new(aligner: A) -> Self {
        Self { aligner, style: DotplotStyle::default() }
    }

    pub fn with_style(mut self, style: DotplotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn aligner(&self) -> &A {
        &self.aligner
    }

    pub fn style(&self) -> &DotplotStyle {
        &self.style
    }

    /// Draw the dotplot of `part1` (x axis) against `part2` (y axis) as a new
    /// page on `canvas`.
    ///
    /// Alignment runs before the page is started, so an aligner failure
    /// leaves the canvas untouched.
    pub fn draw(&self, canvas: &mut dyn Canvas, part1: &ChromPart, part2: &ChromPart) -> DotplotResult<PageSummary> {
        warn_on_length_mismatch(part1);
        warn_on_length_mismatch(part2);

        let (seq1, seq2) = (part1.seq(), part2.seq());
        let boundaries1: Vec<f64> = part1.boundaries().into_iter().map(|b| b as f64).collect();
        let boundaries2: Vec<f64> = part2.boundaries().into_iter().map(|b| b as f64).collect();

        let records = self.aligner.align(seq1, seq2).map_err(|source| DotplotError::PairAlignment {
            part1: part1.id.clone(),
            part2: part2.id.clone(),
            source,
        })?;

        canvas.begin_page(&page_setup(part1, part2))?;

        if !boundaries1.is_empty() {
            canvas.vlines(&boundaries1, &self.style.grid)?;
        }
        if !boundaries2.is_empty() {
            canvas.hlines(&boundaries2, &self.style.grid)?;
        }

        let mut summary = PageSummary {
            part1: part1.id.clone(),
            part2: part2.id.clone(),
            forward: 0,
            reverse: 0,
            repeats1: 0,
            repeats2: 0,
        };

        for record in &records {
            let seg = record.plot_segment();
            canvas.segment(seg.start(), seg.end(), self.style.for_strand(record.strand))?;
            match record.strand {
                Strand::Forward => summary.forward += 1,
                Strand::Reverse => summary.reverse += 1,
            }
        }

        let offset = self.style.repeat_offset_fraction * seq1.len().max(seq2.len()) as f64;

        let repeats1 = detect_simple_repeats(seq1);
        for interval in &repeats1 {
            canvas.segment((interval.start as f64, offset), (interval.end as f64, offset), &self.style.repeat)?;
        }
        let repeats2 = detect_simple_repeats(seq2);
        for interval in &repeats2 {
            canvas.segment((offset, interval.start as f64), (offset, interval.end as f64), &self.style.repeat)?;
        }
        summary.repeats1 = repeats1.len();
        summary.repeats2 = repeats2.len();

        log::debug!(
            "Page {} : {}: {} forward, {} reverse alignments, {}/{} repeats",
            summary.part1,
            summary.part2,
            summary.forward,
            summary.reverse,
            summary.repeats1,
            summary.repeats2
        );

        Ok(summary)
    }
}

fn warn_on_length_mismatch(part: &ChromPart) {
    if part.segments.is_empty() {
        return;
    }
    match part.segment_total() {
        Some(total) if total != part.len() as u64 => log::warn!(
            "Segments of part '{}' add up to {} bp but its sequence is {} bp",
            part.id,
            total,
            part.len()
        ),
        Some(_) => {}
        None => log::warn!("Segment lengths of part '{}' overflow", part.id),
    }
}
