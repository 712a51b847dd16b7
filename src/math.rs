//! Geometry primitives shared across the pipeline: integer rectangles and
//! the least-squares line fit backing glyph orientation measurements.

use nalgebra::{Matrix2, SymmetricEigen};
use serde::{Deserialize, Serialize};

/// Integer rectangle in frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the rightmost column.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    /// One past the bottom row.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    #[inline]
    pub fn center(&self) -> [f64; 2] {
        [
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        ]
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Containment test for a fractional point.
    pub fn contains_point(&self, p: [f64; 2]) -> bool {
        p[0] >= self.x as f64
            && p[0] < self.right() as f64
            && p[1] >= self.y as f64
            && p[1] < self.bottom() as f64
    }

    /// Symmetrically enlarged copy. Negative growth shrinks down to an
    /// empty rectangle.
    pub fn grown(&self, dx: i32, dy: i32) -> Bounds {
        let w = (self.w as i64 + 2 * dx as i64).max(0) as u32;
        let h = (self.h as i64 + 2 * dy as i64).max(0) as u32;
        Bounds {
            x: self.x - dx,
            y: self.y - dy,
            w,
            h,
        }
    }

    /// Smallest rectangle covering both operands.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds {
            x,
            y,
            w: (right - x) as u32,
            h: (bottom - y) as u32,
        }
    }

    /// Signed horizontal overlap between two rectangles; positive when the
    /// x-ranges actually intersect.
    pub fn x_overlap(a: &Bounds, b: &Bounds) -> i32 {
        a.right().min(b.right()) - a.x.max(b.x)
    }
}

/// Orthogonal-regression line fit over a 2D point population.
///
/// Points are folded into raw moments so the fit costs O(1) memory; the
/// principal direction comes out of the 2×2 covariance eigendecomposition.
#[derive(Clone, Debug, Default)]
pub struct LineFit {
    n: f64,
    sx: f64,
    sy: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl LineFit {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn include(&mut self, x: f64, y: f64) {
        self.n += 1.0;
        self.sx += x;
        self.sy += y;
        self.sxx += x * x;
        self.syy += y * y;
        self.sxy += x * y;
    }

    pub fn count(&self) -> usize {
        self.n as usize
    }

    /// Mean of the included points.
    pub fn centroid(&self) -> Option<[f64; 2]> {
        (self.n > 0.0).then(|| [self.sx / self.n, self.sy / self.n])
    }

    /// Solve for the fitted line. A population of 0 or 1 point has no
    /// computable direction and falls back to a horizontal line through the
    /// centroid, if any.
    pub fn solve(&self) -> Option<FittedLine> {
        let [cx, cy] = self.centroid()?;
        if self.n < 2.0 {
            return Some(FittedLine {
                point: [cx, cy],
                dir: [1.0, 0.0],
                mean_distance: 0.0,
            });
        }
        let cxx = self.sxx / self.n - cx * cx;
        let cyy = self.syy / self.n - cy * cy;
        let cxy = self.sxy / self.n - cx * cy;
        let eig = SymmetricEigen::new(Matrix2::new(cxx, cxy, cxy, cyy));
        let (major, minor) = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
            (0, 1)
        } else {
            (1, 0)
        };
        let v = eig.eigenvectors.column(major);
        let norm = (v[0] * v[0] + v[1] * v[1]).sqrt();
        let dir = if norm > 1e-12 {
            // Keep the tangent pointing toward +x so callers can interpolate
            // left to right.
            if v[0] < 0.0 {
                [-v[0] / norm, -v[1] / norm]
            } else {
                [v[0] / norm, v[1] / norm]
            }
        } else {
            [1.0, 0.0]
        };
        // Mean squared point-line distance is the variance along the minor
        // axis.
        let mean_distance = eig.eigenvalues[minor].max(0.0).sqrt();
        Some(FittedLine {
            point: [cx, cy],
            dir,
            mean_distance,
        })
    }
}

/// Result of a [`LineFit`]: centroid, unit tangent and RMS point distance.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FittedLine {
    /// A point on the line (the population centroid).
    pub point: [f64; 2],
    /// Unit tangent, x component >= 0.
    pub dir: [f64; 2],
    /// RMS distance of the population to the line.
    pub mean_distance: f64,
}

impl FittedLine {
    /// Ordinate of the line at abscissa `x`. For a near-vertical line the
    /// centroid ordinate is returned.
    pub fn y_at(&self, x: f64) -> f64 {
        if self.dir[0].abs() < 1e-9 {
            self.point[1]
        } else {
            self.point[1] + (x - self.point[0]) * self.dir[1] / self.dir[0]
        }
    }

    /// Tangent slope dy/dx; 0 for a near-vertical line.
    pub fn slope(&self) -> f64 {
        if self.dir[0].abs() < 1e-9 {
            0.0
        } else {
            self.dir[1] / self.dir[0]
        }
    }
}

/// Ordinate at `x` of the straight line through `p0` and `p1`.
pub fn y_at_x(p0: [f64; 2], p1: [f64; 2], x: f64) -> f64 {
    let dx = p1[0] - p0[0];
    if dx.abs() < 1e-9 {
        p0[1]
    } else {
        p0[1] + (x - p0[0]) * (p1[1] - p0[1]) / dx
    }
}
