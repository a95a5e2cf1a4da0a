//! Text-specific box rules: anchor shifts and baseline handling.

use crate::geom::BoundingBox;
use crate::metrics::TextMeasure;

/// Horizontal anchoring of a text run relative to its x position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Parse the SVG `text-anchor` vocabulary. Unknown values are a
    /// configuration error, so this returns `None` rather than defaulting.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start" => Some(TextAnchor::Start),
            "middle" => Some(TextAnchor::Middle),
            "end" => Some(TextAnchor::End),
            _ => None,
        }
    }
}

/// Untransformed box of a text run anchored at `(x, y)` with `y` on the
/// baseline: the anchor shifts the box horizontally, and the ascent is
/// subtracted so the box top sits above the baseline.
pub fn text_box(
    x: f64,
    y: f64,
    content: &str,
    font_size: f64,
    anchor: TextAnchor,
    measure: &dyn TextMeasure,
) -> BoundingBox {
    let extent = measure.measure(content, font_size);
    let minx = match anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - extent.width / 2.0,
        TextAnchor::End => x - extent.width,
    };
    let miny = y - extent.ascent;
    BoundingBox::new(minx, miny, minx + extent.width, miny + extent.height)
}
