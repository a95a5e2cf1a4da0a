//! Adjacent placement along one axis.
//!
//! The base rule puts the target's near edge at the reference's far edge
//! plus padding; the inner and middle variants reduce to the same rule by
//! substituting an effective padding, so nesting and centering reuse the
//! edge math. With `overlap = true` and a container on either side, a
//! bounded step search finds the smallest extra shift whose shape-aware
//! intersection test comes back clear; exhausting the search enlarges the
//! target instead of leaving it overlapping.

use crate::element::{Element, ElementKind};
use crate::geom::BoundingBox;
use crate::metrics::TextMeasure;

use super::config::LINEAR_SEARCH_STEP;
use super::overlap::{any_intersection, shapes_of, Shape};
use super::strategy::Alignment;
use super::LayoutError;

/// Primary-axis direction of a linear placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearDirection {
    Up,
    Down,
    Left,
    Right,
}

impl LinearDirection {
    pub fn is_vertical(&self) -> bool {
        matches!(self, LinearDirection::Up | LinearDirection::Down)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinearDirection::Up => "up",
            LinearDirection::Down => "down",
            LinearDirection::Left => "left",
            LinearDirection::Right => "right",
        }
    }

    /// Unit vector of the placement direction.
    fn unit(&self) -> (f64, f64) {
        match self {
            LinearDirection::Up => (0.0, -1.0),
            LinearDirection::Down => (0.0, 1.0),
            LinearDirection::Left => (-1.0, 0.0),
            LinearDirection::Right => (1.0, 0.0),
        }
    }
}

/// How the target relates to the reference along the primary axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinearVariant {
    /// Beyond the reference's far edge.
    #[default]
    Edge,
    /// Inside the reference, against its far edge.
    Inner,
    /// Centered on the reference.
    Middle,
}

/// Vertical or horizontal placement of a target next to (or inside) a
/// reference.
#[derive(Debug, Clone)]
pub struct LinearStrategy {
    pub direction: LinearDirection,
    pub variant: LinearVariant,
    pub padding: f64,
    /// Cross-axis offset added after alignment.
    pub offset: f64,
    pub alignment: Alignment,
    pub overlap: bool,
}

impl LinearStrategy {
    pub fn name(&self) -> &'static str {
        match (self.direction.is_vertical(), self.variant) {
            (true, LinearVariant::Edge) => "vertical",
            (true, LinearVariant::Inner) => "vertical_inner",
            (true, LinearVariant::Middle) => "vertical_middle",
            (false, LinearVariant::Edge) => "horizontal",
            (false, LinearVariant::Inner) => "horizontal_inner",
            (false, LinearVariant::Middle) => "horizontal_middle",
        }
    }

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

        let base = self.place(&ref_bb, &old);

        let either_container = matches!(reference.kind, ElementKind::Group { .. })
            || matches!(target.kind, ElementKind::Group { .. });
        if !(self.overlap && either_container) {
            target.set_resolved_box(base);
            return Ok(());
        }

        self.place_avoiding_overlap(reference, target, &ref_bb, &old, base, measure);
        Ok(())
    }

    /// The base placement: near edge at far edge plus effective padding,
    /// cross axis per alignment and offset.
    fn place(&self, r: &BoundingBox, t: &BoundingBox) -> BoundingBox {
        let pad = self.effective_padding(r, t);
        match self.direction {
            LinearDirection::Down => t.at(self.cross_start(r, t), r.maxy + pad),
            LinearDirection::Up => t.at(self.cross_start(r, t), r.miny - pad - t.height()),
            LinearDirection::Right => t.at(r.maxx + pad, self.cross_start(r, t)),
            LinearDirection::Left => t.at(r.minx - pad - t.width(), self.cross_start(r, t)),
        }
    }

    /// The inner and middle variants substitute a negative padding so the
    /// edge formula places the target inside or centered on the reference.
    fn effective_padding(&self, r: &BoundingBox, t: &BoundingBox) -> f64 {
        let (rd, td) = if self.direction.is_vertical() {
            (r.height(), t.height())
        } else {
            (r.width(), t.width())
        };
        match self.variant {
            LinearVariant::Edge => self.padding,
            LinearVariant::Inner => -td - self.padding,
            LinearVariant::Middle => -(td / 2.0 + rd / 2.0) - self.padding,
        }
    }

    /// Cross-axis min coordinate of the target per alignment plus offset.
    fn cross_start(&self, r: &BoundingBox, t: &BoundingBox) -> f64 {
        let (r_min, r_max, t_extent) = if self.direction.is_vertical() {
            (r.minx, r.maxx, t.width())
        } else {
            (r.miny, r.maxy, t.height())
        };
        let aligned = match self.alignment {
            Alignment::Start => r_min,
            Alignment::Middle => (r_min + r_max) / 2.0 - t_extent / 2.0,
            Alignment::End => r_max - t_extent,
        };
        aligned + self.offset
    }

    /// Step search for the smallest extra shift with a clear shape-aware
    /// intersection test. Edge placements shift onward along the placement
    /// direction; inner and middle placements shift back through the
    /// reference's interior. Exhausting the bound enlarges the target to
    /// span the searched extent and places it at the boundary.
    fn place_avoiding_overlap(
        &self,
        reference: &Element,
        target: &mut Element,
        ref_bb: &BoundingBox,
        old: &BoundingBox,
        base: BoundingBox,
        measure: &dyn TextMeasure,
    ) {
        let (ux, uy) = self.direction.unit();
        let sign = match self.variant {
            LinearVariant::Edge => 1.0,
            LinearVariant::Inner | LinearVariant::Middle => -1.0,
        };
        let (ref_extent, target_extent) = if self.direction.is_vertical() {
            (ref_bb.height(), old.height())
        } else {
            (ref_bb.width(), old.width())
        };
        let bound = match self.variant {
            LinearVariant::Edge => ref_extent,
            LinearVariant::Inner | LinearVariant::Middle => {
                (ref_extent - target_extent).max(0.0)
            }
        };

        let ref_shapes = shapes_of(reference, measure);
        let target_shapes = shapes_of(target, measure);

        let mut step = 0;
        loop {
            let shift = LINEAR_SEARCH_STEP * step as f64;
            if shift > bound {
                break;
            }
            let dx = base.minx - old.minx + ux * sign * shift;
            let dy = base.miny - old.miny + uy * sign * shift;
            let candidate: Vec<Shape> =
                target_shapes.iter().map(|s| s.translated(dx, dy)).collect();
            if !any_intersection(&ref_shapes, &candidate) {
                target.set_resolved_box(base.translated(ux * sign * shift, uy * sign * shift));
                return;
            }
            step += 1;
        }

        // Search exhausted: grow the target to span the searched extent and
        // take the boundary placement.
        let factor = if target_extent > 0.0 {
            (target_extent + bound) / target_extent
        } else {
            1.0
        };
        log::warn!(
            "overlap search for {:?} exhausted its bound {bound:.2}; enlarging by {factor:.3}",
            target.id
        );
        target.update_scale(factor, factor);
        let grown = target.resolved_box().unwrap_or(*old);
        let base = self.place(ref_bb, &grown);
        target.set_resolved_box(base.translated(ux * sign * bound, uy * sign * bound));
    }
}
