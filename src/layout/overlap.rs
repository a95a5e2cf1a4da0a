//! Shape-aware intersection testing.
//!
//! The overlap-avoidance searches need to know whether two elements truly
//! collide, not merely whether their coarse boxes do: a title sliding past a
//! donut chart should stop at the ring's ink, not at the ring's bounding
//! square. Elements decompose into flat [`Shape`] lists in absolute
//! coordinates (groups flatten recursively through their transforms, paths
//! flatten into sampled polylines) and shapes are tested pairwise.
//!
//! Touching counts as clear throughout, matching the strict bounding-box
//! overlap predicate: placements that share only an edge or a point are
//! treated as separated.

use crate::element::{Element, ElementKind};
use crate::geom::{path_polylines, BoundingBox, Matrix, Point};
use crate::metrics::TextMeasure;

/// A flattened piece of element ink in absolute coordinates.
#[derive(Debug, Clone)]
pub enum Shape {
    Box(BoundingBox),
    Segment(Point, Point),
    /// An open chain of points; a chain whose last point equals its first is
    /// treated as a closed outline for containment tests.
    Polyline(Vec<Point>),
    Circle { center: Point, radius: f64 },
}

impl Shape {
    pub fn translated(&self, dx: f64, dy: f64) -> Shape {
        let m = Matrix::translation(dx, dy);
        self.transformed(&m)
    }

    pub fn transformed(&self, m: &Matrix) -> Shape {
        match self {
            Shape::Box(bb) => Shape::Box(m.apply_box(bb)),
            Shape::Segment(a, b) => Shape::Segment(m.apply(*a), m.apply(*b)),
            Shape::Polyline(pts) => {
                Shape::Polyline(pts.iter().map(|p| m.apply(*p)).collect())
            }
            Shape::Circle { center, radius } => {
                // Radius scales by the larger basis-vector magnitude, exact
                // for rotations and uniform scales
                let sx = (m.a * m.a + m.b * m.b).sqrt();
                let sy = (m.c * m.c + m.d * m.d).sqrt();
                Shape::Circle {
                    center: m.apply(*center),
                    radius: radius * sx.max(sy),
                }
            }
        }
    }
}

/// Decompose an element into shapes in its parent's coordinate space.
pub fn shapes_of(element: &Element, measure: &dyn TextMeasure) -> Vec<Shape> {
    match &element.kind {
        ElementKind::Group { children, .. } => children
            .iter()
            .flat_map(|c| shapes_of(c, measure))
            .map(|s| s.transformed(&element.transform))
            .collect(),
        ElementKind::Line { x1, y1, x2, y2, .. } => vec![Shape::Segment(
            element.transform.apply(Point::new(*x1, *y1)),
            element.transform.apply(Point::new(*x2, *y2)),
        )],
        ElementKind::Circle { cx, cy, r } => {
            let local = Shape::Circle {
                center: Point::new(*cx, *cy),
                radius: *r,
            };
            vec![local.transformed(&element.transform)]
        }
        ElementKind::Path { segments, .. } => {
            path_polylines(segments, &element.transform)
                .into_iter()
                .map(Shape::Polyline)
                .collect()
        }
        // Rect, text, and image ink fills its box
        _ => vec![Shape::Box(element.bounding_box(measure))],
    }
}

/// Whether any shape of one set materially intersects any shape of the other.
pub fn any_intersection(reference: &[Shape], target: &[Shape]) -> bool {
    reference
        .iter()
        .any(|r| target.iter().any(|t| shapes_intersect(r, t)))
}

fn shapes_intersect(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Box(x), Shape::Box(y)) => x.is_overlapping(y),
        (Shape::Box(bb), Shape::Segment(p, q)) | (Shape::Segment(p, q), Shape::Box(bb)) => {
            box_intersects_segment(bb, *p, *q)
        }
        (Shape::Box(bb), Shape::Polyline(pts)) | (Shape::Polyline(pts), Shape::Box(bb)) => {
            box_intersects_polyline(bb, pts)
        }
        (Shape::Box(bb), Shape::Circle { center, radius })
        | (Shape::Circle { center, radius }, Shape::Box(bb)) => {
            box_distance(bb, *center) < *radius
        }
        (Shape::Segment(p1, p2), Shape::Segment(q1, q2)) => {
            segments_cross(*p1, *p2, *q1, *q2)
        }
        (Shape::Segment(p, q), Shape::Polyline(pts))
        | (Shape::Polyline(pts), Shape::Segment(p, q)) => {
            segment_intersects_polyline(*p, *q, pts)
        }
        (Shape::Segment(p, q), Shape::Circle { center, radius })
        | (Shape::Circle { center, radius }, Shape::Segment(p, q)) => {
            point_segment_distance(*center, *p, *q) < *radius
        }
        (Shape::Polyline(a), Shape::Polyline(b)) => polylines_cross(a, b),
        (Shape::Polyline(pts), Shape::Circle { center, radius })
        | (Shape::Circle { center, radius }, Shape::Polyline(pts)) => {
            circle_intersects_polyline(*center, *radius, pts)
        }
        (
            Shape::Circle { center: c1, radius: r1 },
            Shape::Circle { center: c2, radius: r2 },
        ) => c1.distance(*c2) < r1 + r2,
    }
}

/// Signed area of the triangle (a, b, c); sign gives c's side of a→b.
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper crossing or materially overlapping collinear span. Touching at an
/// endpoint only is clear.
fn segments_cross(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    if d1 == 0.0 && d2 == 0.0 && d3 == 0.0 && d4 == 0.0 {
        // All four endpoints collinear: compare spans on the dominant axis
        let horizontal = (p2.x - p1.x).abs() >= (p2.y - p1.y).abs();
        let span = |a: Point, b: Point| -> (f64, f64) {
            if horizontal {
                (a.x.min(b.x), a.x.max(b.x))
            } else {
                (a.y.min(b.y), a.y.max(b.y))
            }
        };
        let (a1, a2) = span(p1, p2);
        let (b1, b2) = span(q1, q2);
        return a1 < b2 && b1 < a2;
    }

    false
}

fn point_strictly_inside(bb: &BoundingBox, p: Point) -> bool {
    p.x > bb.minx && p.x < bb.maxx && p.y > bb.miny && p.y < bb.maxy
}

fn box_edges(bb: &BoundingBox) -> [(Point, Point); 4] {
    let c = bb.corners();
    [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
}

fn box_intersects_segment(bb: &BoundingBox, a: Point, b: Point) -> bool {
    if point_strictly_inside(bb, a) || point_strictly_inside(bb, b) {
        return true;
    }
    box_edges(bb)
        .iter()
        .any(|(e1, e2)| segments_cross(a, b, *e1, *e2))
}

fn box_intersects_polyline(bb: &BoundingBox, pts: &[Point]) -> bool {
    if pts.iter().any(|p| point_strictly_inside(bb, *p)) {
        return true;
    }
    if pts
        .windows(2)
        .any(|w| box_intersects_segment(bb, w[0], w[1]))
    {
        return true;
    }
    // Box entirely inside a closed outline
    is_closed(pts) && point_in_polygon(bb.center(), pts)
}

fn segment_intersects_polyline(p: Point, q: Point, pts: &[Point]) -> bool {
    if pts.windows(2).any(|w| segments_cross(p, q, w[0], w[1])) {
        return true;
    }
    // Segment entirely inside a closed outline
    let mid = Point::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0);
    is_closed(pts) && point_in_polygon(mid, pts)
}

fn polylines_cross(a: &[Point], b: &[Point]) -> bool {
    for w1 in a.windows(2) {
        for w2 in b.windows(2) {
            if segments_cross(w1[0], w1[1], w2[0], w2[1]) {
                return true;
            }
        }
    }
    // Containment without edge crossings, either way around
    if is_closed(a) && !b.is_empty() && point_in_polygon(b[0], a) {
        return true;
    }
    if is_closed(b) && !a.is_empty() && point_in_polygon(a[0], b) {
        return true;
    }
    false
}

fn circle_intersects_polyline(center: Point, radius: f64, pts: &[Point]) -> bool {
    if pts
        .windows(2)
        .any(|w| point_segment_distance(center, w[0], w[1]) < radius)
    {
        return true;
    }
    is_closed(pts) && point_in_polygon(center, pts)
}

/// Distance from a point to the closest point of a box (zero inside).
fn box_distance(bb: &BoundingBox, p: Point) -> f64 {
    let dx = (bb.minx - p.x).max(0.0).max(p.x - bb.maxx);
    let dy = (bb.miny - p.y).max(0.0).max(p.y - bb.maxy);
    (dx * dx + dy * dy).sqrt()
}

fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * abx, a.y + t * aby))
}

fn is_closed(pts: &[Point]) -> bool {
    pts.len() >= 4 && pts.first() == pts.last()
}

/// Even-odd ray cast.
fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let pi = poly[i];
        let pj = poly[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FontMetrics;

    fn metrics() -> FontMetrics {
        FontMetrics::default()
    }

    #[test]
    fn test_overlapping_boxes() {
        let a = Shape::Box(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::Box(BoundingBox::new(5.0, 5.0, 15.0, 15.0));
        assert!(shapes_intersect(&a, &b));
    }

    #[test]
    fn test_touching_boxes_clear() {
        let a = Shape::Box(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::Box(BoundingBox::new(10.0, 0.0, 20.0, 10.0));
        assert!(!shapes_intersect(&a, &b));
    }

    #[test]
    fn test_segments_cross() {
        let a = Shape::Segment(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = Shape::Segment(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
        assert!(shapes_intersect(&a, &b));
    }

    #[test]
    fn test_segments_touching_at_endpoint_clear() {
        let a = Shape::Segment(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        let b = Shape::Segment(Point::new(5.0, 5.0), Point::new(10.0, 0.0));
        assert!(!shapes_intersect(&a, &b));
    }

    #[test]
    fn test_collinear_overlapping_segments() {
        let a = Shape::Segment(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Shape::Segment(Point::new(5.0, 0.0), Point::new(15.0, 0.0));
        assert!(shapes_intersect(&a, &b));

        let c = Shape::Segment(Point::new(10.0, 0.0), Point::new(20.0, 0.0));
        assert!(!shapes_intersect(&a, &c), "end-to-end segments are clear");
    }

    #[test]
    fn test_segment_through_box() {
        let bb = Shape::Box(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let seg = Shape::Segment(Point::new(-5.0, 5.0), Point::new(15.0, 5.0));
        assert!(shapes_intersect(&bb, &seg));
    }

    #[test]
    fn test_segment_along_box_edge_clear() {
        let bb = Shape::Box(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let seg = Shape::Segment(Point::new(-5.0, 0.0), Point::new(15.0, 0.0));
        assert!(!shapes_intersect(&bb, &seg));
    }

    #[test]
    fn test_circle_near_box() {
        let bb = Shape::Box(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let close = Shape::Circle {
            center: Point::new(12.0, 5.0),
            radius: 3.0,
        };
        let far = Shape::Circle {
            center: Point::new(15.0, 5.0),
            radius: 3.0,
        };
        assert!(shapes_intersect(&bb, &close));
        assert!(!shapes_intersect(&bb, &far));
    }

    #[test]
    fn test_closed_outline_contains_box() {
        // A diamond strictly containing a small box: no edge crossings
        let diamond = Shape::Polyline(vec![
            Point::new(0.0, -10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(-10.0, 0.0),
            Point::new(0.0, -10.0),
        ]);
        let small = Shape::Box(BoundingBox::new(-1.0, -1.0, 1.0, 1.0));
        assert!(shapes_intersect(&diamond, &small));

        let outside = Shape::Box(BoundingBox::new(20.0, 20.0, 22.0, 22.0));
        assert!(!shapes_intersect(&diamond, &outside));
    }

    #[test]
    fn test_open_polyline_no_containment() {
        // Same vertices but not closed: nothing encloses the box
        let open = Shape::Polyline(vec![
            Point::new(0.0, -10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(-10.0, 0.0),
        ]);
        let small = Shape::Box(BoundingBox::new(-1.0, -1.0, 1.0, 1.0));
        assert!(!shapes_intersect(&open, &small));
    }

    #[test]
    fn test_shapes_of_flattens_nested_groups() {
        let inner = Element::group(vec![Element::line(0.0, 0.0, 10.0, 0.0, 1.0)])
            .with_transform(Matrix::translation(0.0, 5.0));
        let outer = Element::group(vec![inner]).with_transform(Matrix::translation(100.0, 0.0));
        let shapes = shapes_of(&outer, &metrics());
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Segment(a, b) => {
                assert_eq!(*a, Point::new(100.0, 5.0));
                assert_eq!(*b, Point::new(110.0, 5.0));
            }
            other => panic!("expected segment, got {other:?}"),
        }
    }

    #[test]
    fn test_shapes_of_path_becomes_polyline() {
        let el = Element::path_from_data("M 0 0 L 10 0 L 10 10 Z", 1.0);
        let shapes = shapes_of(&el, &metrics());
        assert_eq!(shapes.len(), 1);
        assert!(matches!(&shapes[0], Shape::Polyline(pts) if pts.len() >= 4));
    }

    #[test]
    fn test_any_intersection_over_sets() {
        let refs = vec![
            Shape::Box(BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            Shape::Box(BoundingBox::new(10.0, 10.0, 11.0, 11.0)),
        ];
        let hit = vec![Shape::Box(BoundingBox::new(10.5, 10.5, 12.0, 12.0))];
        let miss = vec![Shape::Box(BoundingBox::new(5.0, 5.0, 6.0, 6.0))];
        assert!(any_intersection(&refs, &hit));
        assert!(!any_intersection(&refs, &miss));
    }

    #[test]
    fn test_translated_shape() {
        let s = Shape::Segment(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        match s.translated(5.0, 2.0) {
            Shape::Segment(a, b) => {
                assert_eq!(a, Point::new(5.0, 2.0));
                assert_eq!(b, Point::new(6.0, 2.0));
            }
            other => panic!("expected segment, got {other:?}"),
        }
    }
}
