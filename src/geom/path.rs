//! Path segment geometry: bounds, sampling, and arc anchor points.
//!
//! Segments store absolute coordinates; the text form of a path is resolved
//! into these by [`crate::parser::parse_path`]. Elliptical arcs are converted
//! once, at parse time, to the W3C center parameterization (SVG spec F.6.5)
//! so that bounds, sampling, and anchor queries all work from the same
//! representation.

use super::{BoundingBox, Matrix, Point};

/// Radial offset of the "outer" arc anchor beyond the arc itself.
pub const ARC_ANCHOR_OFFSET: f64 = 25.0;

/// Sample count per curved segment when flattening for intersection tests.
pub const CURVE_SAMPLES: usize = 16;

/// One resolved command of a path, in absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Pen relocation; starts a new subpath.
    Move { to: Point },
    /// Straight stroke from `from` to `to`.
    Line { from: Point, to: Point },
    /// Cubic Bézier with two control points.
    Cubic {
        from: Point,
        c1: Point,
        c2: Point,
        to: Point,
    },
    /// Elliptical arc in center parameterization.
    Arc(ArcSegment),
    /// Straight stroke back to the subpath start.
    Close { from: Point, to: Point },
}

/// An elliptical arc described by its center, radii, axis rotation, and the
/// swept angle range. `start_angle` and `delta_angle` are in radians on the
/// ellipse's own axes; `delta_angle` is signed (positive sweeps toward
/// increasing angle).
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub from: Point,
    pub to: Point,
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation in radians.
    pub x_rotation: f64,
    pub start_angle: f64,
    pub delta_angle: f64,
}

impl ArcSegment {
    /// Point on the arc at ellipse angle `theta`.
    pub fn point_at(&self, theta: f64) -> Point {
        let (sin_phi, cos_phi) = self.x_rotation.sin_cos();
        let x = self.rx * theta.cos();
        let y = self.ry * theta.sin();
        Point::new(
            self.center.x + x * cos_phi - y * sin_phi,
            self.center.y + x * sin_phi + y * cos_phi,
        )
    }

    /// Point at the middle of the swept range. Used as the attachment anchor
    /// for pictogram placement.
    pub fn midpoint(&self) -> Point {
        self.point_at(self.start_angle + self.delta_angle / 2.0)
    }

    /// Whether ellipse angle `theta` falls inside the swept range.
    pub fn sweep_contains(&self, theta: f64) -> bool {
        let tau = std::f64::consts::TAU;
        let mut rel = (theta - self.start_angle) % tau;
        if self.delta_angle >= 0.0 {
            if rel < 0.0 {
                rel += tau;
            }
            rel <= self.delta_angle
        } else {
            if rel > 0.0 {
                rel -= tau;
            }
            rel >= self.delta_angle
        }
    }

    /// Ellipse angles at which the arc can reach an axis-aligned extreme.
    fn extreme_angles(&self) -> [f64; 4] {
        let (sin_phi, cos_phi) = self.x_rotation.sin_cos();
        // d/dθ of the x coordinate vanishes at tan θ = -ry·sinφ / rx·cosφ,
        // of the y coordinate at tan θ = ry·cosφ / rx·sinφ.
        let theta_x = f64::atan2(-self.ry * sin_phi, self.rx * cos_phi);
        let theta_y = f64::atan2(self.ry * cos_phi, self.rx * sin_phi);
        [
            theta_x,
            theta_x + std::f64::consts::PI,
            theta_y,
            theta_y + std::f64::consts::PI,
        ]
    }
}

/// A computed attachment point on an arc: the arc midpoint, and the same
/// point pushed radially outward by [`ARC_ANCHOR_OFFSET`] for placements that
/// must clear the stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcAnchor {
    pub center: Point,
    pub anchor: Point,
    pub outer: Point,
}

impl PathSegment {
    /// End point of the segment (the pen position after drawing it).
    pub fn end(&self) -> Point {
        match self {
            PathSegment::Move { to } => *to,
            PathSegment::Line { to, .. } => *to,
            PathSegment::Cubic { to, .. } => *to,
            PathSegment::Arc(arc) => arc.to,
            PathSegment::Close { to, .. } => *to,
        }
    }

    /// Candidate points whose min/max fold gives the segment's exact bounds:
    /// endpoints, cubic derivative roots, and in-sweep arc extremes.
    pub fn bound_candidates(&self) -> Vec<Point> {
        match self {
            PathSegment::Move { to } => vec![*to],
            PathSegment::Line { from, to } | PathSegment::Close { from, to } => {
                vec![*from, *to]
            }
            PathSegment::Cubic { from, c1, c2, to } => {
                let mut pts = vec![*from, *to];
                for t in cubic_extrema(from.x, c1.x, c2.x, to.x) {
                    pts.push(cubic_point(from, c1, c2, to, t));
                }
                for t in cubic_extrema(from.y, c1.y, c2.y, to.y) {
                    pts.push(cubic_point(from, c1, c2, to, t));
                }
                pts
            }
            PathSegment::Arc(arc) => {
                let mut pts = vec![arc.from, arc.to];
                for theta in arc.extreme_angles() {
                    if arc.sweep_contains(theta) {
                        pts.push(arc.point_at(theta));
                    }
                }
                pts
            }
        }
    }

    /// Evenly spaced points along the segment, used by the shape-aware
    /// overlap predicate. Straight segments return their endpoints.
    pub fn sample(&self, n: usize) -> Vec<Point> {
        match self {
            PathSegment::Move { to } => vec![*to],
            PathSegment::Line { from, to } | PathSegment::Close { from, to } => {
                vec![*from, *to]
            }
            PathSegment::Cubic { from, c1, c2, to } => (0..=n)
                .map(|i| cubic_point(from, c1, c2, to, i as f64 / n as f64))
                .collect(),
            PathSegment::Arc(arc) => (0..=n)
                .map(|i| {
                    arc.point_at(arc.start_angle + arc.delta_angle * i as f64 / n as f64)
                })
                .collect(),
        }
    }
}

/// Exact bounds of a command stream: every candidate point is mapped through
/// `transform` before folding, and arc candidates are padded by half the
/// stroke width after mapping.
///
/// An empty stream yields a zero-area box at the origin.
pub fn path_bounds(
    segments: &[PathSegment],
    transform: &Matrix,
    stroke_width: f64,
) -> BoundingBox {
    let mut bb: Option<BoundingBox> = None;
    for seg in segments {
        let candidates = seg.bound_candidates();
        let mut seg_bb =
            BoundingBox::from_points(candidates.iter().map(|&p| transform.apply(p)));
        if matches!(seg, PathSegment::Arc(_)) && stroke_width > 0.0 {
            seg_bb = seg_bb.padded(stroke_width / 2.0);
        }
        bb = Some(match bb {
            Some(acc) => acc.union(&seg_bb),
            None => seg_bb,
        });
    }
    bb.unwrap_or_default()
}

/// Flatten a command stream into transformed polylines, one per subpath.
pub fn path_polylines(segments: &[PathSegment], transform: &Matrix) -> Vec<Vec<Point>> {
    let mut lines: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for seg in segments {
        match seg {
            PathSegment::Move { to } => {
                if current.len() > 1 {
                    lines.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                current.push(transform.apply(*to));
            }
            _ => {
                for p in seg.sample(CURVE_SAMPLES) {
                    let p = transform.apply(p);
                    if current.last() != Some(&p) {
                        current.push(p);
                    }
                }
            }
        }
    }
    if current.len() > 1 {
        lines.push(current);
    }
    lines
}

/// Attachment anchors for every arc in the stream, in stream order, mapped
/// through `transform`.
pub fn arc_anchors(segments: &[PathSegment], transform: &Matrix) -> Vec<ArcAnchor> {
    segments
        .iter()
        .filter_map(|seg| match seg {
            PathSegment::Arc(arc) => {
                let anchor = arc.midpoint();
                let dx = anchor.x - arc.center.x;
                let dy = anchor.y - arc.center.y;
                let dist = (dx * dx + dy * dy).sqrt();
                let outer = if dist > 0.0 {
                    let s = (dist + ARC_ANCHOR_OFFSET) / dist;
                    Point::new(arc.center.x + dx * s, arc.center.y + dy * s)
                } else {
                    anchor
                };
                Some(ArcAnchor {
                    center: transform.apply(arc.center),
                    anchor: transform.apply(anchor),
                    outer: transform.apply(outer),
                })
            }
            _ => None,
        })
        .collect()
}

/// Convert an SVG endpoint arc (`A rx ry rot large-arc sweep x y`) to the
/// center parameterization, following the W3C conversion (SVG 1.1 F.6.5)
/// including the out-of-range radius correction.
///
/// Returns `None` for degenerate input (zero radius or coincident
/// endpoints), which the SVG spec says to draw as a straight line or drop.
pub fn arc_to_center(
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    x_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<ArcSegment> {
    if from == to {
        return None;
    }
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return None;
    }

    let phi = x_rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // F.6.5.1: midpoint-relative coordinates in the ellipse frame
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // F.6.6: scale radii up when the endpoints cannot be reached
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    // F.6.5.2: center in the ellipse frame
    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    // Clamp tiny negatives introduced by the radius correction
    let mut coef = (num / den).max(0.0).sqrt();
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    // F.6.5.3: back to user coordinates
    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    // F.6.5.5/6: start angle and sweep
    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let start_angle = uy.atan2(ux);
    let end_angle = vy.atan2(vx);
    let mut delta_angle = end_angle - start_angle;
    if sweep && delta_angle < 0.0 {
        delta_angle += std::f64::consts::TAU;
    } else if !sweep && delta_angle > 0.0 {
        delta_angle -= std::f64::consts::TAU;
    }

    Some(ArcSegment {
        from,
        to,
        center: Point::new(cx, cy),
        rx,
        ry,
        x_rotation: phi,
        start_angle,
        delta_angle,
    })
}

/// Evaluate a cubic Bézier at `t`.
fn cubic_point(p0: &Point, p1: &Point, p2: &Point, p3: &Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Interior parameters where one coordinate of a cubic Bézier reaches an
/// extreme: the roots of the derivative inside (0, 1).
fn cubic_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> Vec<f64> {
    // B'(t) = a·t² + b·t + c
    let a = -3.0 * p0 + 9.0 * p1 - 9.0 * p2 + 3.0 * p3;
    let b = 6.0 * p0 - 12.0 * p1 + 6.0 * p2;
    let c = 3.0 * (p1 - p0);

    let mut roots = Vec::new();
    if a.abs() < 1e-12 {
        if b.abs() > 1e-12 {
            roots.push(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            roots.push((-b + sq) / (2.0 * a));
            roots.push((-b - sq) / (2.0 * a));
        }
    }
    roots.retain(|t| *t > 0.0 && *t < 1.0);
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_line_bounds() {
        let segs = vec![
            PathSegment::Move {
                to: Point::new(1.0, 2.0),
            },
            PathSegment::Line {
                from: Point::new(1.0, 2.0),
                to: Point::new(5.0, -3.0),
            },
        ];
        let bb = path_bounds(&segs, &Matrix::IDENTITY, 0.0);
        assert_eq!(bb, BoundingBox::new(1.0, -3.0, 5.0, 2.0));
    }

    #[test]
    fn test_cubic_bounds_exceed_endpoints() {
        // A bulge upward: control points well above the chord
        let segs = vec![PathSegment::Cubic {
            from: Point::new(0.0, 0.0),
            c1: Point::new(25.0, -40.0),
            c2: Point::new(75.0, -40.0),
            to: Point::new(100.0, 0.0),
        }];
        let bb = path_bounds(&segs, &Matrix::IDENTITY, 0.0);
        assert!(approx(bb.minx, 0.0));
        assert!(approx(bb.maxx, 100.0));
        // Peak of this symmetric cubic is at t=0.5: y = -30
        assert!(approx(bb.miny, -30.0), "miny = {}", bb.miny);
        assert!(approx(bb.maxy, 0.0));
    }

    #[test]
    fn test_cubic_bounds_tighter_than_control_hull() {
        let segs = vec![PathSegment::Cubic {
            from: Point::new(0.0, 0.0),
            c1: Point::new(0.0, -100.0),
            c2: Point::new(10.0, -100.0),
            to: Point::new(10.0, 0.0),
        }];
        let bb = path_bounds(&segs, &Matrix::IDENTITY, 0.0);
        // The curve never reaches the control points' y = -100
        assert!(bb.miny > -100.0 + EPSILON);
        assert!(bb.miny < -70.0, "curve has real extent, miny = {}", bb.miny);
    }

    #[test]
    fn test_arc_to_center_half_circle() {
        // Upper half of the unit circle around (1, 0), drawn left to right
        let arc = arc_to_center(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .expect("valid arc");
        assert!(approx(arc.center.x, 1.0), "cx = {}", arc.center.x);
        assert!(approx(arc.center.y, 0.0), "cy = {}", arc.center.y);
        assert!(approx(arc.delta_angle.abs(), std::f64::consts::PI));
    }

    #[test]
    fn test_arc_bounds_include_extreme() {
        // Sweep=true (positive angles) is the +y side in y-down coordinates
        let arc = arc_to_center(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        let bb = path_bounds(&[PathSegment::Arc(arc)], &Matrix::IDENTITY, 0.0);
        assert!(approx(bb.minx, 0.0));
        assert!(approx(bb.maxx, 2.0));
        assert!(approx(bb.miny, 0.0));
        assert!(approx(bb.maxy, 1.0), "arc belly at y = 1, got {}", bb.maxy);
    }

    #[test]
    fn test_arc_stroke_padding() {
        let arc = arc_to_center(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        let bb = path_bounds(&[PathSegment::Arc(arc)], &Matrix::IDENTITY, 2.0);
        assert!(approx(bb.minx, -1.0));
        assert!(approx(bb.maxy, 2.0));
    }

    #[test]
    fn test_arc_degenerate_inputs() {
        assert!(arc_to_center(
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            5.0,
            5.0,
            0.0,
            false,
            true
        )
        .is_none());
        assert!(arc_to_center(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            0.0,
            5.0,
            0.0,
            false,
            true
        )
        .is_none());
    }

    #[test]
    fn test_arc_radius_correction() {
        // Radii too small to span the endpoints get scaled up uniformly
        let arc = arc_to_center(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .expect("correctable arc");
        assert!(approx(arc.rx, 5.0), "rx = {}", arc.rx);
        assert!(approx(arc.ry, 5.0), "ry = {}", arc.ry);
    }

    #[test]
    fn test_anchor_extends_radially() {
        let arc = arc_to_center(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        let anchors = arc_anchors(&[PathSegment::Arc(arc)], &Matrix::IDENTITY);
        assert_eq!(anchors.len(), 1);
        let a = &anchors[0];
        // Mid-sweep of the +y half circle is its lowest point
        assert!(approx(a.anchor.x, 1.0));
        assert!(approx(a.anchor.y, 1.0));
        assert!(approx(a.outer.x, 1.0));
        assert!(
            approx(a.outer.y, 1.0 + ARC_ANCHOR_OFFSET),
            "outer.y = {}",
            a.outer.y
        );
    }

    #[test]
    fn test_sample_counts() {
        let arc = arc_to_center(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        let pts = PathSegment::Arc(arc).sample(8);
        assert_eq!(pts.len(), 9);
        assert!(approx(pts[0].x, 0.0));
        assert!(approx(pts[8].x, 2.0));
    }

    #[test]
    fn test_polylines_split_on_move() {
        let segs = vec![
            PathSegment::Move {
                to: Point::new(0.0, 0.0),
            },
            PathSegment::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(1.0, 0.0),
            },
            PathSegment::Move {
                to: Point::new(5.0, 5.0),
            },
            PathSegment::Line {
                from: Point::new(5.0, 5.0),
                to: Point::new(6.0, 5.0),
            },
        ];
        let lines = path_polylines(&segs, &Matrix::IDENTITY);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[1][0], Point::new(5.0, 5.0));
    }

    #[test]
    fn test_empty_stream_zero_box() {
        let bb = path_bounds(&[], &Matrix::IDENTITY, 1.0);
        assert_eq!(bb, BoundingBox::zero());
    }

    #[test]
    fn test_bounds_transform_applied_per_point() {
        let segs = vec![
            PathSegment::Move {
                to: Point::new(0.0, 0.0),
            },
            PathSegment::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(10.0, 0.0),
            },
        ];
        let bb = path_bounds(&segs, &Matrix::translation(5.0, 7.0), 0.0);
        assert_eq!(bb, BoundingBox::new(5.0, 7.0, 15.0, 7.0));
    }
}
