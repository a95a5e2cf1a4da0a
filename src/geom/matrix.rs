//! Affine transforms as 2×3 matrices.
//!
//! A transform is six coefficients `[a, b, c, d, e, f]` mapping a point
//! `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)` — the SVG `matrix(...)`
//! layout. Rotation follows the SVG convention: positive angles rotate
//! clockwise on screen because the y axis points down.
//!
//! Boxes are transformed with the loose-bounds algorithm: map the four
//! corners, then take the axis-aligned box of the results. Once rotation is
//! in play a transform is not axis-preserving, so this over-estimates for
//! rotated content, which is acceptable for layout positioning and matches
//! CSS/SVG behavior.

use super::{BoundingBox, Point};

/// A 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Rotation by `degrees` about the origin.
    pub fn rotation(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        let cos = radians.cos();
        let sin = radians.sin();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `degrees` about a pivot point, realized as
    /// translate(pivot) · rotate · translate(−pivot).
    pub fn rotation_about(degrees: f64, cx: f64, cy: f64) -> Self {
        Self::translation(cx, cy)
            .multiply(&Self::rotation(degrees))
            .multiply(&Self::translation(-cx, -cy))
    }

    /// Non-uniform scale about the origin.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Matrix product `self · rhs`.
    ///
    /// Applying the result to a point is equivalent to applying `rhs` first
    /// and `self` second, so folding an SVG transform list left to right with
    /// `m = m.multiply(op)` gives the list its standard meaning.
    pub fn multiply(&self, rhs: &Matrix) -> Matrix {
        Matrix::new(
            self.a * rhs.a + self.c * rhs.b,
            self.b * rhs.a + self.d * rhs.b,
            self.a * rhs.c + self.c * rhs.d,
            self.b * rhs.c + self.d * rhs.d,
            self.a * rhs.e + self.c * rhs.f + self.e,
            self.b * rhs.e + self.d * rhs.f + self.f,
        )
    }

    /// Map a point through the transform.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Map a box through the transform: all four corners are mapped and the
    /// axis-aligned box of the results is returned.
    pub fn apply_box(&self, bb: &BoundingBox) -> BoundingBox {
        if self.is_identity() {
            return *bb;
        }
        BoundingBox::from_points(bb.corners().iter().map(|&p| self.apply(p)))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}
