//! Chamfer distance transform around a glyph.
//!
//! Two raster passes with the classic 3-4 mask propagate an integer
//! distance outward from the glyph's foreground pixels over a bounded
//! window. Values divided by the orthogonal step (3) approximate Euclidean
//! pixel distance closely enough for gap thresholding; the window keeps the
//! cost proportional to the neighborhood actually being probed, not the
//! whole sheet.

use super::Glyph;
use crate::math::Bounds;

const ORTHO: i32 = 3;
const DIAG: i32 = 4;
/// Sentinel high enough to survive additions of `DIAG` without overflow.
const FAR: i32 = i32::MAX / 2;

/// Distance transform table seeded at zero on one glyph's pixels.
pub struct DistanceField {
    window: Bounds,
    width: usize,
    height: usize,
    table: Vec<i32>,
}

impl DistanceField {
    /// Build the transform for `glyph` over `window` (typically the glyph
    /// bounds fattened by the maximum acceptable gap).
    pub fn around(glyph: &Glyph, window: Bounds) -> Self {
        let width = window.w as usize;
        let height = window.h as usize;
        let mut table = vec![FAR; width * height];

        glyph.for_each_pixel(|x, y| {
            if window.contains(x, y) {
                let col = (x - window.x) as usize;
                let row = (y - window.y) as usize;
                table[row * width + col] = 0;
            }
        });

        let mut field = Self {
            window,
            width,
            height,
            table,
        };
        field.forward_pass();
        field.backward_pass();
        field
    }

    fn forward_pass(&mut self) {
        for row in 0..self.height {
            for col in 0..self.width {
                let mut d = self.table[row * self.width + col];
                if col > 0 {
                    d = d.min(self.table[row * self.width + col - 1] + ORTHO);
                }
                if row > 0 {
                    let up = (row - 1) * self.width;
                    d = d.min(self.table[up + col] + ORTHO);
                    if col > 0 {
                        d = d.min(self.table[up + col - 1] + DIAG);
                    }
                    if col + 1 < self.width {
                        d = d.min(self.table[up + col + 1] + DIAG);
                    }
                }
                self.table[row * self.width + col] = d;
            }
        }
    }

    fn backward_pass(&mut self) {
        for row in (0..self.height).rev() {
            for col in (0..self.width).rev() {
                let mut d = self.table[row * self.width + col];
                if col + 1 < self.width {
                    d = d.min(self.table[row * self.width + col + 1] + ORTHO);
                }
                if row + 1 < self.height {
                    let down = (row + 1) * self.width;
                    d = d.min(self.table[down + col] + ORTHO);
                    if col + 1 < self.width {
                        d = d.min(self.table[down + col + 1] + DIAG);
                    }
                    if col > 0 {
                        d = d.min(self.table[down + col - 1] + DIAG);
                    }
                }
                self.table[row * self.width + col] = d;
            }
        }
    }

    /// Minimum transform value over `other`'s pixels inside the window,
    /// normalized to pixel units. [`f64::INFINITY`] when no pixel of
    /// `other` falls inside the window.
    pub fn distance_to(&self, other: &Glyph) -> f64 {
        let mut best = FAR;
        other.for_each_pixel(|x, y| {
            if self.window.contains(x, y) {
                let col = (x - self.window.x) as usize;
                let row = (y - self.window.y) as usize;
                best = best.min(self.table[row * self.width + col]);
            }
        });
        if best == FAR {
            f64::INFINITY
        } else {
            best as f64 / ORTHO as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::{Orientation, RunImage};

    fn rect(left: i32, top: i32, w: u32, h: u32) -> Glyph {
        Glyph::new(
            left,
            top,
            RunImage::from_fn(Orientation::Horizontal, w, h, |_, _| true),
        )
    }

    #[test]
    fn zero_on_own_pixels() {
        let g = rect(5, 5, 3, 3);
        let field = DistanceField::around(&g, g.bounds().grown(2, 2));
        assert_eq!(field.distance_to(&g), 0.0);
    }

    #[test]
    fn horizontal_gap_is_exact() {
        let a = rect(0, 0, 4, 2);
        let b = rect(7, 0, 3, 2);
        // Nearest pixels sit at x=3 and x=7, four orthogonal steps apart.
        let field = DistanceField::around(&a, a.bounds().grown(5, 5));
        assert!((field.distance_to(&b) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_gap_approximates_euclidean() {
        let a = rect(0, 0, 2, 2);
        let b = rect(5, 5, 2, 2);
        let field = DistanceField::around(&a, a.bounds().grown(8, 8));
        // Nearest pixels are (1,1) and (5,5): Euclidean ≈ 5.66, chamfer 3-4
        // gives 4·4/3 ≈ 5.33.
        let d = field.distance_to(&b);
        assert!(d > 5.0 && d < 5.7, "chamfer distance {d}");
    }

    #[test]
    fn outside_window_is_infinite() {
        let a = rect(0, 0, 2, 2);
        let b = rect(50, 50, 2, 2);
        let field = DistanceField::around(&a, a.bounds().grown(3, 3));
        assert!(field.distance_to(&b).is_infinite());
    }
}
