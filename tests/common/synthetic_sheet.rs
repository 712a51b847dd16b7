//! Synthetic sheet geometry and section images for integration tests.

use glyph_detector::ledger::{Scale, Staff, StaffLine, SystemGeometry};
use glyph_detector::runs::{Orientation, RunImage};

pub const SHEET_W: u32 = 320;
pub const SHEET_H: u32 = 240;
pub const INTERLINE: u32 = 16;

/// Sheet scale used by all synthetic fixtures.
pub fn scale() -> Scale {
    Scale {
        interline: INTERLINE,
        line_thickness: 2,
    }
}

/// A five-line straight staff: top line at `top_y`, spanning x 20..300.
pub fn straight_staff(id: u32, top_y: f64) -> Staff {
    let lines = (0..5)
        .map(|i| {
            let y = top_y + (i * INTERLINE) as f64;
            StaffLine::straight([20.0, y], [300.0, y])
        })
        .collect();
    Staff::new(id, lines, INTERLINE)
}

/// Horizontal bar specification for the section image.
#[derive(Clone, Copy)]
pub struct Bar {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl Bar {
    /// A ledger-like bar: `width` px long, `thickness` px tall, whose
    /// pixel-center row midpoint sits at `y_center`.
    pub fn ledger(x0: u32, width: u32, y_center: f64, thickness: u32) -> Self {
        let y0 = (y_center - thickness as f64 / 2.0).round() as u32;
        Self {
            x0,
            x1: x0 + width,
            y0,
            y1: y0 + thickness,
        }
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Section image holding exactly the given bars (staff lines are already
/// filtered out upstream, so the section image doubles as the staff-free
/// source).
pub fn section_image(bars: &[Bar]) -> RunImage {
    let bars = bars.to_vec();
    RunImage::from_fn(Orientation::Horizontal, SHEET_W, SHEET_H, move |x, y| {
        bars.iter().any(|bar| bar.contains(x, y))
    })
}

/// One-staff system over the given bars.
pub fn one_staff_system(id: u32, staff_top_y: f64) -> SystemGeometry {
    SystemGeometry {
        id,
        staves: vec![straight_staff(id * 10 + 1, staff_top_y)],
        beams: Vec::new(),
    }
}
