//! Geometry kernel: points, axis-aligned bounding boxes, affine transforms,
//! and path segment math.

mod matrix;
mod path;

pub use matrix::Matrix;
pub use path::{
    arc_anchors, arc_to_center, path_bounds, path_polylines, ArcAnchor, ArcSegment,
    PathSegment, ARC_ANCHOR_OFFSET, CURVE_SAMPLES,
};

/// A 2D point in document coordinates (y grows downward, SVG convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned bounding box stored as its corner coordinates.
///
/// Width and height are derived, so `width() == maxx - minx` holds by
/// construction and a well-formed box can never report a negative extent.
/// A zero-area box is valid and describes empty content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl BoundingBox {
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    /// Create a zero-sized bounding box at the origin.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Build a box from an origin corner and a size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Smallest box enclosing every point of the iterator.
    ///
    /// Returns a zero box at the origin when the iterator is empty.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let first = match iter.next() {
            Some(p) => p,
            None => return Self::zero(),
        };
        let mut bb = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bb = bb.expand_to_include(p);
        }
        bb
    }

    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.minx + self.maxx) / 2.0,
            (self.miny + self.maxy) / 2.0,
        )
    }

    /// Check whether a point lies inside the box (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.minx && p.x <= self.maxx && p.y >= self.miny && p.y <= self.maxy
    }

    /// Strict overlap test: boxes that merely share an edge or a corner do
    /// not overlap.
    pub fn is_overlapping(&self, other: &BoundingBox) -> bool {
        self.minx < other.maxx
            && self.maxx > other.minx
            && self.miny < other.maxy
            && self.maxy > other.miny
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.minx.min(other.minx),
            self.miny.min(other.miny),
            self.maxx.max(other.maxx),
            self.maxy.max(other.maxy),
        )
    }

    /// Expand the box to include one more point.
    pub fn expand_to_include(&self, p: Point) -> BoundingBox {
        BoundingBox::new(
            self.minx.min(p.x),
            self.miny.min(p.y),
            self.maxx.max(p.x),
            self.maxy.max(p.y),
        )
    }

    /// The box shifted by a translation. This is the one mutation layout
    /// strategies apply to an already resolved box; everything else
    /// recomputes boxes from scratch.
    pub fn translated(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(self.minx + dx, self.miny + dy, self.maxx + dx, self.maxy + dy)
    }

    /// The box grown by `amount` on every side.
    pub fn padded(&self, amount: f64) -> BoundingBox {
        BoundingBox::new(
            self.minx - amount,
            self.miny - amount,
            self.maxx + amount,
            self.maxy + amount,
        )
    }

    /// The box repositioned so its min corner sits at `(minx, miny)`,
    /// keeping its size.
    pub fn at(&self, minx: f64, miny: f64) -> BoundingBox {
        BoundingBox::new(minx, miny, minx + self.width(), miny + self.height())
    }

    /// The box recentered on a point, keeping its size.
    pub fn centered_at(&self, center: Point) -> BoundingBox {
        let hw = self.width() / 2.0;
        let hh = self.height() / 2.0;
        BoundingBox::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
    }

    /// Corner points in (min,min), (max,min), (min,max), (max,max) order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.minx, self.miny),
            Point::new(self.maxx, self.miny),
            Point::new(self.minx, self.maxy),
            Point::new(self.maxx, self.maxy),
        ]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}
