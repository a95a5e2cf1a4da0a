//! Uniform rescaling of an element against a reference's dimensions.

use crate::element::Element;
use crate::geom::BoundingBox;

use super::LayoutError;

/// Width/height bounds expressed as ratios of a reference element's
/// corresponding dimension. Unset ratios leave that axis unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeConstraint {
    pub max_width_ratio: Option<f64>,
    pub max_height_ratio: Option<f64>,
    pub min_width_ratio: Option<f64>,
    pub min_height_ratio: Option<f64>,
}

impl SizeConstraint {
    pub fn is_empty(&self) -> bool {
        self.max_width_ratio.is_none()
            && self.max_height_ratio.is_none()
            && self.min_width_ratio.is_none()
            && self.min_height_ratio.is_none()
    }

    /// Rescale `target` so its dimensions sit within the bounds derived from
    /// `reference`. With both bounds on an axis the scale aims for their
    /// midpoint; with one bound it aims for that bound; degenerate dimensions
    /// leave the axis factor at 1.0. Returns the effective uniform scale so
    /// callers can propagate it to visually paired elements.
    pub fn rescale(
        &self,
        reference: &BoundingBox,
        target: &mut Element,
    ) -> Result<f64, LayoutError> {
        let bb = target
            .resolved_box()
            .ok_or_else(|| LayoutError::unresolved(target.id.as_deref()))?;

        let scale_x = axis_scale(
            bound(self.max_width_ratio, reference.width()),
            bound(self.min_width_ratio, reference.width()),
            bb.width(),
        );
        let scale_y = axis_scale(
            bound(self.max_height_ratio, reference.height()),
            bound(self.min_height_ratio, reference.height()),
            bb.height(),
        );

        if scale_x == 1.0 && scale_y == 1.0 {
            return Ok(1.0);
        }
        Ok(target.update_scale(scale_x, scale_y))
    }
}

/// A ratio bound resolved against the reference dimension. Bounds that come
/// out non-positive (unset ratio, or a degenerate reference) are dropped.
fn bound(ratio: Option<f64>, reference_extent: f64) -> Option<f64> {
    let value = ratio? * reference_extent;
    if value > 0.0 {
        Some(value)
    } else {
        log::warn!("size bound degenerates to {value}; treating the axis as unconstrained");
        None
    }
}

fn axis_scale(max: Option<f64>, min: Option<f64>, extent: f64) -> f64 {
    if extent <= 0.0 {
        if max.is_some() || min.is_some() {
            log::warn!("cannot rescale a zero-extent axis; factor defaults to 1.0");
        }
        return 1.0;
    }
    match (max, min) {
        (Some(mx), Some(mn)) => (mx + mn) / (2.0 * extent),
        (Some(mx), None) => mx / extent,
        (None, Some(mn)) => mn / extent,
        (None, None) => 1.0,
    }
}
