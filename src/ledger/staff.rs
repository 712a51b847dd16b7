//! Staff and system geometry consumed by the ledger sweep.
//!
//! This is the minimum surface the sweep needs from the surrounding
//! recognition framework: interline scaling, staff-line ordinates at an
//! arbitrary abscissa, the per-staff map of accepted ledgers by virtual
//! line index, and the good-beam boxes ledgers must not cross.

use crate::math::Bounds;
use crate::sig::InterId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sheet scale: interline and staff-line thickness in pixels.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Scale {
    /// Vertical distance between adjacent staff lines.
    pub interline: u32,
    /// Main staff-line thickness.
    pub line_thickness: u32,
}

impl Scale {
    /// Interline fraction to pixels, rounded.
    pub fn to_pixels(&self, frac: f64) -> i32 {
        (frac * self.interline as f64).round() as i32
    }

    /// Interline fraction to pixels, unrounded.
    pub fn to_pixels_f(&self, frac: f64) -> f64 {
        frac * self.interline as f64
    }

    /// Pixels to interline fraction.
    pub fn pixels_to_frac(&self, pixels: f64) -> f64 {
        pixels / self.interline as f64
    }

    /// Pixels to line-thickness fraction.
    pub fn pixels_to_line_frac(&self, pixels: f64) -> f64 {
        pixels / self.line_thickness.max(1) as f64
    }

    /// Scale with the same line thickness but a staff-specific interline.
    pub fn with_interline(&self, interline: u32) -> Scale {
        Scale {
            interline,
            line_thickness: self.line_thickness,
        }
    }
}

/// One staff line as a left-to-right sampled polyline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaffLine {
    /// At least two points, sorted by abscissa.
    pub points: Vec<[f64; 2]>,
}

impl StaffLine {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        debug_assert!(points.len() >= 2, "a staff line needs at least two points");
        Self { points }
    }

    /// Straight line through two endpoints.
    pub fn straight(p0: [f64; 2], p1: [f64; 2]) -> Self {
        Self::new(vec![p0, p1])
    }

    /// Ordinate at `x`: interpolation between the surrounding samples,
    /// extrapolation with the end segment's slope outside the span.
    pub fn y_at(&self, x: f64) -> f64 {
        let points = &self.points;
        let segment = if x <= points[0][0] {
            [points[0], points[1]]
        } else if x >= points[points.len() - 1][0] {
            [points[points.len() - 2], points[points.len() - 1]]
        } else {
            let hi = points.partition_point(|p| p[0] < x).max(1);
            [points[hi - 1], points[hi]]
        };
        crate::math::y_at_x(segment[0], segment[1], x)
    }

    /// Bounding box of the polyline, one pixel tall at minimum.
    pub fn bounds(&self) -> Bounds {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.points {
            min_x = min_x.min(p[0]);
            max_x = max_x.max(p[0]);
            min_y = min_y.min(p[1]);
            max_y = max_y.max(p[1]);
        }
        Bounds::new(
            min_x.floor() as i32,
            min_y.floor() as i32,
            (max_x - min_x).ceil().max(1.0) as u32,
            (max_y - min_y).ceil().max(1.0) as u32,
        )
    }
}

/// A staff: its lines top to bottom plus the ledger bookkeeping the sweep
/// fills in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Staff {
    pub id: u32,
    /// Staff lines, top to bottom.
    pub lines: Vec<StaffLine>,
    /// Staff-specific interline (small staves differ from the sheet scale).
    pub interline: u32,
    /// Most negative virtual line index to explore above the staff, when
    /// clamped (merged grand-staff parts stop early).
    #[serde(default)]
    pub min_index: Option<i32>,
    /// Most positive virtual line index to explore below the staff.
    #[serde(default)]
    pub max_index: Option<i32>,
    /// Accepted ledgers per signed virtual line index.
    #[serde(skip)]
    ledgers: BTreeMap<i32, Vec<InterId>>,
}

impl Staff {
    pub fn new(id: u32, lines: Vec<StaffLine>, interline: u32) -> Self {
        Self {
            id,
            lines,
            interline,
            min_index: None,
            max_index: None,
            ledgers: BTreeMap::new(),
        }
    }

    /// Topmost staff line.
    pub fn first_line(&self) -> &StaffLine {
        self.lines.first().expect("staff has lines")
    }

    /// Bottom staff line.
    pub fn last_line(&self) -> &StaffLine {
        self.lines.last().expect("staff has lines")
    }

    pub fn add_ledger(&mut self, index: i32, inter: InterId) {
        self.ledgers.entry(index).or_default().push(inter);
    }

    /// Accepted ledgers at a virtual line index, if any.
    pub fn ledgers_at(&self, index: i32) -> Option<&[InterId]> {
        self.ledgers.get(&index).map(Vec::as_slice)
    }

    /// All accepted ledgers keyed by index.
    pub fn ledger_map(&self) -> &BTreeMap<i32, Vec<InterId>> {
        &self.ledgers
    }
}

/// Geometry of one detection unit: its staves and the good beams ledgers
/// must stay clear of.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemGeometry {
    pub id: u32,
    pub staves: Vec<Staff>,
    /// Bounding boxes of accepted beam interpretations, any order.
    #[serde(default)]
    pub beams: Vec<Bounds>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_conversions() {
        let scale = Scale {
            interline: 20,
            line_thickness: 3,
        };
        assert_eq!(scale.to_pixels(0.5), 10);
        assert!((scale.pixels_to_frac(5.0) - 0.25).abs() < 1e-12);
        assert!((scale.pixels_to_line_frac(6.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn staff_line_interpolates_and_extrapolates() {
        let line = StaffLine::new(vec![[0.0, 10.0], [10.0, 10.0], [20.0, 12.0]]);
        assert!((line.y_at(5.0) - 10.0).abs() < 1e-12);
        assert!((line.y_at(15.0) - 11.0).abs() < 1e-12);
        // Extrapolation continues the last segment.
        assert!((line.y_at(30.0) - 14.0).abs() < 1e-12);
        assert!((line.y_at(-10.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn ledger_map_accumulates_per_index() {
        let mut staff = Staff::new(
            1,
            vec![StaffLine::straight([0.0, 0.0], [100.0, 0.0])],
            20,
        );
        staff.add_ledger(1, 4);
        staff.add_ledger(1, 9);
        staff.add_ledger(-1, 2);
        assert_eq!(staff.ledgers_at(1), Some(&[4, 9][..]));
        assert_eq!(staff.ledgers_at(-1), Some(&[2][..]));
        assert_eq!(staff.ledgers_at(2), None);
    }
}
