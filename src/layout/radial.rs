//! Scale-based placement along the ray from a circle center through the
//! reference.
//!
//! The target keeps its size and is re-centered at
//! `center + s · (ref_center − center)` for the boundary scale `s` found by
//! bisection: the smallest displacement at which the overlap predicate comes
//! back clear. Padding is applied afterward as an equivalent scale delta.
//!
//! Candidate centers are computed as `ref_center + (s − 1) · v` rather than
//! `center + s · v`; the two are algebraically identical but the first stays
//! accurate when the circle center is astronomically far away, which the
//! degenerate far-center cases rely on.

use crate::element::{Element, ElementKind};
use crate::geom::Point;
use crate::metrics::TextMeasure;

use super::config::{RADIAL_SCALE_BOUND, SEARCH_MAX_ITERATIONS, SEARCH_TOLERANCE};
use super::overlap::{any_intersection, shapes_of, Shape};
use super::LayoutError;

/// Whether the target moves outward from or inward through the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialDirection {
    Inner,
    Outer,
}

impl RadialDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RadialDirection::Inner => "inner",
            RadialDirection::Outer => "outer",
        }
    }
}

/// Radial placement about a fixed circle center.
#[derive(Debug, Clone)]
pub struct RadialStrategy {
    pub direction: RadialDirection,
    pub padding: f64,
    pub center: Point,
    pub overlap: bool,
}

impl RadialStrategy {
    pub fn apply(
        &self,
        reference: &Element,
        target: &mut Element,
        measure: &dyn TextMeasure,
    ) -> Result<(), LayoutError> {
        let ref_bb = reference
            .resolved_box()
            .ok_or_else(|| LayoutError::unresolved(reference.id.as_deref()))?;
        let old = target
            .resolved_box()
            .ok_or_else(|| LayoutError::unresolved(target.id.as_deref()))?;

        let ref_center = ref_bb.center();
        let distance = self.center.distance(ref_center);
        if distance == 0.0 {
            log::warn!(
                "radial placement of {:?} is degenerate: reference centered on the circle center",
                target.id
            );
            return Ok(());
        }

        let shape_aware = self.overlap
            && (matches!(reference.kind, ElementKind::Group { .. })
                || matches!(target.kind, ElementKind::Group { .. }));
        let ref_shapes = if shape_aware {
            shapes_of(reference, measure)
        } else {
            Vec::new()
        };
        let target_shapes = if shape_aware {
            shapes_of(target, measure)
        } else {
            Vec::new()
        };

        let clear = |s: f64| -> bool {
            let candidate = old.centered_at(self.candidate(ref_center, s));
            if shape_aware {
                let dx = candidate.minx - old.minx;
                let dy = candidate.miny - old.miny;
                let moved: Vec<Shape> =
                    target_shapes.iter().map(|sh| sh.translated(dx, dy)).collect();
                !any_intersection(&ref_shapes, &moved)
            } else {
                !ref_bb.is_overlapping(&candidate)
            }
        };

        // Bisect toward the smallest displacement with a clear placement.
        // Outer: s in (1, bound), answer on the clear (upper) side.
        // Inner: s in (-bound, 1), answer on the clear (lower) side.
        let boundary = match self.direction {
            RadialDirection::Outer => {
                if clear(1.0) {
                    1.0
                } else {
                    let mut lo = 1.0;
                    let mut hi = RADIAL_SCALE_BOUND;
                    if !clear(hi) {
                        log::warn!(
                            "radial search for {:?} found no clear placement within its bound",
                            target.id
                        );
                    }
                    for _ in 0..SEARCH_MAX_ITERATIONS {
                        if self
                            .candidate(ref_center, lo)
                            .distance(self.candidate(ref_center, hi))
                            <= SEARCH_TOLERANCE
                        {
                            break;
                        }
                        let mid = (lo + hi) / 2.0;
                        if clear(mid) {
                            hi = mid;
                        } else {
                            lo = mid;
                        }
                    }
                    hi
                }
            }
            RadialDirection::Inner => {
                if clear(1.0) {
                    1.0
                } else {
                    let mut lo = -RADIAL_SCALE_BOUND;
                    let mut hi = 1.0;
                    if !clear(lo) {
                        log::warn!(
                            "radial search for {:?} found no clear placement within its bound",
                            target.id
                        );
                    }
                    for _ in 0..SEARCH_MAX_ITERATIONS {
                        if self
                            .candidate(ref_center, lo)
                            .distance(self.candidate(ref_center, hi))
                            <= SEARCH_TOLERANCE
                        {
                            break;
                        }
                        let mid = (lo + hi) / 2.0;
                        if clear(mid) {
                            lo = mid;
                        } else {
                            hi = mid;
                        }
                    }
                    lo
                }
            }
        };

        // Padding converts to a scale delta along the same ray.
        let delta = self.padding / distance;
        let scale = match self.direction {
            RadialDirection::Outer => boundary + delta,
            RadialDirection::Inner => boundary - delta,
        };

        target.set_resolved_box(old.centered_at(self.candidate(ref_center, scale)));
        Ok(())
    }

    fn candidate(&self, ref_center: Point, s: f64) -> Point {
        let dx = ref_center.x - self.center.x;
        let dy = ref_center.y - self.center.y;
        Point::new(ref_center.x + (s - 1.0) * dx, ref_center.y + (s - 1.0) * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FontMetrics;

    const TOLERANCE: f64 = 0.01;

    fn metrics() -> FontMetrics {
        FontMetrics::default()
    }

    fn resolved_rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        let mut el = Element::rect(x, y, w, h);
        el.resolve(&metrics());
        el
    }

    #[test]
    fn test_outer_with_padding() {
        let reference = resolved_rect(0.0, 0.0, 2.0, 2.0);
        let mut target = resolved_rect(100.0, 100.0, 2.0, 2.0);
        let s = RadialStrategy {
            direction: RadialDirection::Outer,
            padding: 5.0,
            center: Point::new(-1.0, 1.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        let bb = target.resolved_box().unwrap();
        assert!((bb.minx - 7.0).abs() < TOLERANCE, "minx = {}", bb.minx);
        assert!((bb.miny - 0.0).abs() < TOLERANCE, "miny = {}", bb.miny);
    }

    #[test]
    fn test_inner_crosses_the_center() {
        let reference = resolved_rect(-2.0, 0.0, 2.0, 2.0);
        let mut target = resolved_rect(50.0, 50.0, 2.0, 2.0);
        let s = RadialStrategy {
            direction: RadialDirection::Inner,
            padding: 0.0,
            center: Point::new(0.0, 0.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        let bb = target.resolved_box().unwrap();
        assert!((bb.minx - 0.0).abs() < TOLERANCE, "minx = {}", bb.minx);
        assert!((bb.miny + 2.0).abs() < TOLERANCE, "miny = {}", bb.miny);
    }

    #[test]
    fn test_boxes_disjoint_after_placement() {
        let reference = resolved_rect(0.0, 0.0, 2.0, 2.0);
        let mut target = resolved_rect(0.0, 0.0, 2.0, 2.0);
        let s = RadialStrategy {
            direction: RadialDirection::Outer,
            padding: 0.0,
            center: Point::new(-1.0, 1.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        let ref_bb = reference.resolved_box().unwrap();
        let bb = target.resolved_box().unwrap();
        assert!(!ref_bb.is_overlapping(&bb));
    }

    #[test]
    fn test_already_clear_keeps_base_scale() {
        // Zero-area boxes never overlap under the strict predicate, so the
        // boundary is the starting scale and only the padding moves the
        // target.
        let reference = resolved_rect(2.0, 0.0, 0.0, 0.0);
        let mut target = resolved_rect(50.0, 50.0, 0.0, 0.0);
        let s = RadialStrategy {
            direction: RadialDirection::Outer,
            padding: 2.0,
            center: Point::new(0.0, 0.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        let bb = target.resolved_box().unwrap();
        // Reference center (2, 0), distance 2, padding delta 1: the scale
        // becomes 2 and the center lands at (4, 0)
        assert!((bb.center().x - 4.0).abs() < TOLERANCE);
        assert!((bb.center().y - 0.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_degenerate_center_is_a_noop() {
        let reference = resolved_rect(-1.0, -1.0, 2.0, 2.0);
        let mut target = resolved_rect(5.0, 5.0, 2.0, 2.0);
        let before = target.resolved_box().unwrap();
        let s = RadialStrategy {
            direction: RadialDirection::Outer,
            padding: 5.0,
            center: Point::new(0.0, 0.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        assert_eq!(target.resolved_box().unwrap(), before);
    }
}
