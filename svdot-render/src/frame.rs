//! Page geometry shared by the SVG and PDF backends
//!
//! Pages are laid out in pixels with a top-left origin. World coordinates
//! (sequence positions) map into the inner plot box with y growing upwards.

use svdot_core::PageSetup;

/// Millimetres per CSS pixel at 96 dpi
pub const PX_TO_MM: f64 = 0.264583;

/// CSS pixels per typographic point
pub const PT_TO_PX: f64 = 96.0 / 72.0;

/// Inner plot box of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFrame {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
}

impl PlotFrame {
    pub fn new(setup: &PageSetup, width: u32, height: u32, font_size: u32) -> Self {
        let width = width as f64;
        let height = height as f64;
        let font = font_size as f64;
        Self {
            width,
            height,
            left: 40.0 + 3.0 * font,
            right: width - 20.0,
            top: 20.0 + 2.0 * font,
            bottom: height - (20.0 + 2.5 * font),
            x_limits: setup.x_limits,
            y_limits: setup.y_limits,
        }
    }

    /// Map a world point to page pixels
    pub fn to_page(&self, point: (f64, f64)) -> (f64, f64) {
        (self.world_to_page_x(point.0), self.world_to_page_y(point.1))
    }

    pub fn world_to_page_x(&self, x: f64) -> f64 {
        let (x0, x1) = self.x_limits;
        self.left + (x - x0) / span(x0, x1) * (self.right - self.left)
    }

    pub fn world_to_page_y(&self, y: f64) -> f64 {
        let (y0, y1) = self.y_limits;
        // Invert Y so that larger positions are higher on the page
        self.bottom - (y - y0) / span(y0, y1) * (self.bottom - self.top)
    }

    pub fn x_ticks(&self) -> Vec<f64> {
        nice_ticks_world(self.x_limits.0, self.x_limits.1, 6)
    }

    pub fn y_ticks(&self) -> Vec<f64> {
        nice_ticks_world(self.y_limits.0, self.y_limits.1, 6)
    }
}

fn span(min: f64, max: f64) -> f64 {
    if max > min {
        max - min
    } else {
        1.0
    }
}

// Format a basepair position in human-friendly units
pub fn format_bp(bp: f64) -> String {
    if bp >= 1e9 { format!("{:.2} Gb", bp / 1e9) }
    else if bp >= 1e6 { format!("{:.2} Mb", bp / 1e6) }
    else if bp >= 1e3 { format!("{:.2} kb", bp / 1e3) }
    else { format!("{:.0} bp", bp) }
}

// Round a length to a "nice" number: 1, 2, or 5 × 10^k
pub fn nice_round_length(x: f64) -> f64 {
    if x <= 0.0 { return 1.0; }
    let exp = x.log10().floor();
    let base = 10f64.powi(exp as i32);
    let mant = x / base;
    let nice = if mant <= 1.0 { 1.0 } else if mant <= 2.0 { 2.0 } else if mant <= 5.0 { 5.0 } else { 10.0 };
    nice * base
}

/// Tick positions at multiples of a nice step between `min_world` and `max_world`
pub fn nice_ticks_world(min_world: f64, max_world: f64, desired: usize) -> Vec<f64> {
    let span = (max_world - min_world).max(1.0);
    let step = nice_round_length(span / desired.max(1) as f64);
    let mut ticks = Vec::new();
    let mut k = (min_world / step).ceil();
    while k * step <= max_world {
        ticks.push(k * step);
        k += 1.0;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(len1: f64, len2: f64) -> PageSetup {
        PageSetup {
            title: "a : b".into(),
            x_label: "Position in a".into(),
            y_label: "Position in b".into(),
            x_limits: (0.0, len1),
            y_limits: (0.0, len2),
        }
    }

    #[test]
    fn test_world_corners_map_to_plot_box() {
        let frame = PlotFrame::new(&setup(1000.0, 500.0), 800, 600, 12);
        assert_eq!(frame.to_page((0.0, 0.0)), (frame.left, frame.bottom));
        assert_eq!(frame.to_page((1000.0, 500.0)), (frame.right, frame.top));
    }

    #[test]
    fn test_empty_limits_do_not_divide_by_zero() {
        let frame = PlotFrame::new(&setup(0.0, 0.0), 800, 600, 12);
        let (x, y) = frame.to_page((0.0, 0.0));
        assert!(x.is_finite() && y.is_finite());
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks_world(0.0, 1000.0, 6), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]);
        assert_eq!(nice_ticks_world(0.0, 12.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
        assert_eq!(nice_round_length(3.2), 5.0);
        assert_eq!(nice_round_length(0.0), 1.0);
    }

    #[test]
    fn test_format_bp() {
        assert_eq!(format_bp(950.0), "950 bp");
        assert_eq!(format_bp(1500.0), "1.50 kb");
        assert_eq!(format_bp(2_000_000.0), "2.00 Mb");
    }
}
