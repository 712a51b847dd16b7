//! Glyphs: connected foreground pixel sets with absolute placement.
//!
//! A [`Glyph`] couples a top-left origin with a horizontal run table and
//! derives its geometric attributes (weight, centroid, fitted line, mean
//! thickness) lazily from the pixel content. Identity is by value: two
//! glyphs with the same origin and pixel content compare equal and hash
//! alike, which is what the [`GlyphRegistry`] dedup relies on.
//!
//! Submodules cover the rest of the glyph machinery: extraction of maximal
//! connected components ([`labeler`]), the chamfer distance field
//! ([`distances`]), proximity linking ([`links`]) and the compound
//! enumerator ([`compound`]).

pub mod compound;
pub mod distances;
pub mod labeler;
pub mod links;
pub mod registry;

pub use compound::{enumerate_compounds, CompoundOracle};
pub use distances::DistanceField;
pub use labeler::extract_glyphs;
pub use links::{build_links, GlyphLink, ProximityGraph};
pub use registry::{GlyphId, GlyphRegistry};

use crate::math::{Bounds, FittedLine, LineFit};
use crate::runs::{Orientation, RowAccumulator, RunImage};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Derived geometry, computed once from the pixel population.
#[derive(Clone, Debug)]
struct Derived {
    centroid: [f64; 2],
    line: FittedLine,
}

/// Immutable connected pixel set with absolute placement.
#[derive(Debug)]
pub struct Glyph {
    left: i32,
    top: i32,
    table: RunImage,
    derived: OnceLock<Derived>,
}

impl Glyph {
    /// Wrap a horizontal run table positioned at (left, top).
    pub fn new(left: i32, top: i32, table: RunImage) -> Self {
        debug_assert_eq!(table.orientation(), Orientation::Horizontal);
        Self {
            left,
            top,
            table,
            derived: OnceLock::new(),
        }
    }

    /// Merge several glyphs into one compound glyph covering the union of
    /// their pixels. Overlapping pixels are counted once.
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a Arc<Glyph>>) -> Option<Glyph> {
        let mut acc = RowAccumulator::new();
        for part in parts {
            acc.push_table(part.left, part.top, &part.table);
        }
        let (left, top, table) = acc.into_table()?;
        Some(Glyph::new(left, top, table))
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.left
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Backing run table, origin-relative.
    #[inline]
    pub fn table(&self) -> &RunImage {
        &self.table
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.left, self.top, self.table.width(), self.table.height())
    }

    /// Foreground pixel count.
    #[inline]
    pub fn weight(&self) -> u32 {
        self.table.weight()
    }

    /// Whether the absolute frame point (x, y) is a foreground pixel.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < self.left || y < self.top {
            return false;
        }
        self.table.contains((x - self.left) as u32, (y - self.top) as u32)
    }

    /// Visit every pixel in absolute frame coordinates.
    pub fn for_each_pixel(&self, mut visit: impl FnMut(i32, i32)) {
        let (left, top) = (self.left, self.top);
        self.table
            .for_each_pixel(|x, y| visit(left + x as i32, top + y as i32));
    }

    fn derived(&self) -> &Derived {
        self.derived.get_or_init(|| {
            let mut fit = LineFit::new();
            self.for_each_pixel(|x, y| fit.include(x as f64 + 0.5, y as f64 + 0.5));
            let line = fit.solve().unwrap_or(FittedLine {
                point: [self.left as f64, self.top as f64],
                dir: [1.0, 0.0],
                mean_distance: 0.0,
            });
            Derived {
                centroid: line.point,
                line,
            }
        })
    }

    /// Centroid of the pixel population, absolute coordinates.
    pub fn centroid(&self) -> [f64; 2] {
        self.derived().centroid
    }

    /// Least-squares line through the pixel population.
    pub fn line(&self) -> FittedLine {
        self.derived().line
    }

    /// RMS distance of the pixels to the fitted line, a straightness
    /// measure.
    pub fn mean_distance(&self) -> f64 {
        self.derived().line.mean_distance
    }

    /// Mean thickness across the given orientation: weight over extent.
    pub fn mean_thickness(&self, orientation: Orientation) -> f64 {
        let extent = match orientation {
            Orientation::Horizontal => self.table.width(),
            Orientation::Vertical => self.table.height(),
        };
        if extent == 0 {
            0.0
        } else {
            self.weight() as f64 / extent as f64
        }
    }

    /// Point of the fitted line at the left edge of the bounding box.
    pub fn start_point(&self) -> [f64; 2] {
        let x = self.left as f64;
        [x, self.line().y_at(x)]
    }

    /// Point of the fitted line at the right edge of the bounding box.
    pub fn stop_point(&self) -> [f64; 2] {
        let x = self.bounds().right() as f64;
        [x, self.line().y_at(x)]
    }

    /// Midpoint of the fitted line over the glyph extent.
    pub fn middle_point(&self) -> [f64; 2] {
        let p0 = self.start_point();
        let p1 = self.stop_point();
        [(p0[0] + p1[0]) / 2.0, (p0[1] + p1[1]) / 2.0]
    }
}

// Value identity: origin plus pixel content. Derived caches are excluded.
impl PartialEq for Glyph {
    fn eq(&self, other: &Self) -> bool {
        if self.left != other.left
            || self.top != other.top
            || self.weight() != other.weight()
            || self.table.width() != other.table.width()
            || self.table.height() != other.table.height()
        {
            return false;
        }
        (0..self.table.sequence_count()).all(|s| self.table.runs(s) == other.table.runs(s))
    }
}

impl Eq for Glyph {}

impl Hash for Glyph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.top.hash(state);
        for s in 0..self.table.sequence_count() {
            for run in self.table.runs(s) {
                run.start.hash(state);
                run.length.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(left: i32, top: i32, width: u32, height: u32) -> Glyph {
        Glyph::new(
            left,
            top,
            RunImage::from_fn(Orientation::Horizontal, width, height, |_, _| true),
        )
    }

    #[test]
    fn derived_attributes_of_a_bar() {
        let g = bar(10, 20, 8, 2);
        assert_eq!(g.weight(), 16);
        assert_eq!(g.bounds(), Bounds::new(10, 20, 8, 2));
        let c = g.centroid();
        assert!((c[0] - 14.0).abs() < 1e-9 && (c[1] - 21.0).abs() < 1e-9);
        assert!((g.mean_thickness(Orientation::Horizontal) - 2.0).abs() < 1e-9);
        assert!(g.line().slope().abs() < 1e-9);
        assert!((g.start_point()[1] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn value_identity() {
        let a = bar(1, 2, 4, 1);
        let b = bar(1, 2, 4, 1);
        let c = bar(1, 3, 4, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn merge_counts_overlap_once() {
        let a = Arc::new(bar(0, 0, 4, 1));
        let b = Arc::new(bar(2, 0, 4, 1));
        let m = Glyph::merge([&a, &b]).unwrap();
        assert_eq!(m.bounds(), Bounds::new(0, 0, 6, 1));
        assert_eq!(m.weight(), 6);
    }
}
