//! Rotation-based placement about a circle center.
//!
//! The target keeps its size and its distance from the center; it is swept
//! away from the reference's angular position until the overlap predicate
//! comes back clear, then pushed a further `padding / radius` radians in the
//! sweep direction.
//!
//! Candidate centers are computed as `ref_center + (R(θ) − I) · v` instead of
//! rotating `v` and adding it back to the circle center. The forms agree
//! algebraically, but the first keeps full precision when the center is
//! astronomically far away, where the rotation degenerates to a straight
//! slide past the reference.

use crate::element::{Element, ElementKind};
use crate::geom::Point;
use crate::metrics::TextMeasure;

use super::config::{SEARCH_MAX_ITERATIONS, SEARCH_TOLERANCE};
use super::overlap::{any_intersection, shapes_of, Shape};
use super::LayoutError;

/// Sweep direction of the rotation, in y-down document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clock,
    Anticlock,
}

impl RotationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationDirection::Clock => "clock",
            RotationDirection::Anticlock => "anticlock",
        }
    }

    fn sign(&self) -> f64 {
        match self {
            RotationDirection::Anticlock => 1.0,
            RotationDirection::Clock => -1.0,
        }
    }
}

/// Angular placement about a fixed circle center.
#[derive(Debug, Clone)]
pub struct CircularStrategy {
    pub direction: RotationDirection,
    pub padding: f64,
    pub center: Point,
    pub overlap: bool,
}

impl CircularStrategy {
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
        let radius = self.center.distance(ref_center);
        if radius == 0.0 {
            log::warn!(
                "circular placement of {:?} is degenerate: reference centered on the circle center",
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

        let clear = |theta: f64| -> bool {
            let candidate = old.centered_at(self.candidate(ref_center, theta));
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

        // Bisect the sweep angle in [0, pi] toward the smallest clear
        // rotation. Convergence is measured as the movement of the candidate
        // center, not the raw angle interval, so far-away centers still
        // converge to a meaningful position.
        let boundary = if clear(0.0) {
            0.0
        } else {
            let mut lo: f64 = 0.0;
            let mut hi = std::f64::consts::PI;
            if !clear(hi) {
                log::warn!(
                    "circular search for {:?} found no clear placement within a half turn",
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
        };

        // Padding converts to an arc angle at this radius.
        let theta = boundary + self.padding / radius;
        target.set_resolved_box(old.centered_at(self.candidate(ref_center, theta)));
        Ok(())
    }

    fn candidate(&self, ref_center: Point, theta: f64) -> Point {
        let dx = ref_center.x - self.center.x;
        let dy = ref_center.y - self.center.y;
        let (sin, cos) = (theta * self.direction.sign()).sin_cos();
        Point::new(
            ref_center.x + dx * (cos - 1.0) - dy * sin,
            ref_center.y + dx * sin + dy * (cos - 1.0),
        )
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
    fn test_anticlock_quarter_turn_plus_padding() {
        let reference = resolved_rect(0.0, 0.0, 2.0, 2.0);
        let mut target = resolved_rect(100.0, 100.0, 2.0, 2.0);
        let s = CircularStrategy {
            direction: RotationDirection::Anticlock,
            padding: (std::f64::consts::PI / 6.0) * 2.0,
            center: Point::new(-1.0, 1.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        let bb = target.resolved_box().unwrap();
        assert!((bb.minx + 3.0).abs() < TOLERANCE, "minx = {}", bb.minx);
        assert!(
            (bb.miny - 3.0_f64.sqrt()).abs() < TOLERANCE,
            "miny = {}",
            bb.miny
        );
    }

    #[test]
    fn test_clock_far_center_degenerates_to_slide() {
        // A center effectively at infinity to the left turns the rotation
        // into a vertical slide past the reference.
        let reference = resolved_rect(0.0, 0.0, 2.0, 2.0);
        let mut target = resolved_rect(100.0, 100.0, 2.0, 2.0);
        let s = CircularStrategy {
            direction: RotationDirection::Clock,
            padding: 0.0,
            center: Point::new(-1e36, 1.0),
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
        let s = CircularStrategy {
            direction: RotationDirection::Anticlock,
            padding: 0.0,
            center: Point::new(-1.0, 1.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        assert!(!reference
            .resolved_box()
            .unwrap()
            .is_overlapping(&target.resolved_box().unwrap()));
    }

    #[test]
    fn test_radius_preserved() {
        let reference = resolved_rect(4.0, -1.0, 2.0, 2.0);
        let mut target = resolved_rect(0.0, 0.0, 2.0, 2.0);
        let center = Point::new(0.0, 0.0);
        let s = CircularStrategy {
            direction: RotationDirection::Clock,
            padding: 1.0,
            center,
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        let placed = target.resolved_box().unwrap().center();
        assert!((center.distance(placed) - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_degenerate_center_is_a_noop() {
        let reference = resolved_rect(-1.0, -1.0, 2.0, 2.0);
        let mut target = resolved_rect(5.0, 5.0, 2.0, 2.0);
        let before = target.resolved_box().unwrap();
        let s = CircularStrategy {
            direction: RotationDirection::Clock,
            padding: 1.0,
            center: Point::new(0.0, 0.0),
            overlap: false,
        };
        s.apply(&reference, &mut target, &metrics()).unwrap();
        assert_eq!(target.resolved_box().unwrap(), before);
    }
}
