//! The element model: a tree of positionable nodes.
//!
//! Every node is an [`Element`] carrying identity, an affine transform, a
//! padding record, and a lazily resolved bounding box. The node's shape lives
//! in [`ElementKind`], a closed sum over the container kind (`Group`) and the
//! atom kinds, each with its own box rule. Layout strategies mutate resolved
//! boxes; [`Element::update_pos`] and [`Element::update_scale`] then fold the
//! movement back into the transform so the attributes an external serializer
//! reads always match the resolved geometry.

mod text;

pub use text::{text_box, TextAnchor};

use crate::geom::{path_bounds, BoundingBox, Matrix, PathSegment};
use crate::layout::{LayoutStrategy, SizeConstraint};
use crate::metrics::TextMeasure;
use crate::parser::parse_path;

/// Per-side padding folded into an element's reported box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

/// A positionable node in the document tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: Option<String>,
    pub transform: Matrix,
    pub padding: Padding,
    resolved: Option<BoundingBox>,
    pub kind: ElementKind,
}

/// The closed set of element shapes.
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Container owning an ordered list of children. The optional strategy
    /// and constraint describe how the children relate to each other; the
    /// constraint's reference names the child the others are sized against.
    Group {
        children: Vec<Element>,
        layout: Option<LayoutStrategy>,
        constraint: Option<SizeConstraint>,
        reference: Option<String>,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke_width: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        font_size: f64,
        anchor: TextAnchor,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: Option<String>,
        /// Intrinsic pixel dimensions of the asset, when known.
        intrinsic: Option<(f64, f64)>,
        preserve_aspect: bool,
    },
    Path {
        segments: Vec<PathSegment>,
        stroke_width: f64,
    },
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: None,
            transform: Matrix::IDENTITY,
            padding: Padding::default(),
            resolved: None,
            kind,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn group(children: Vec<Element>) -> Self {
        Self::new(ElementKind::Group {
            children,
            layout: None,
            constraint: None,
            reference: None,
        })
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ElementKind::Rect {
            x,
            y,
            width,
            height,
        })
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64) -> Self {
        Self::new(ElementKind::Line {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
        })
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::new(ElementKind::Circle { cx, cy, r })
    }

    pub fn text(x: f64, y: f64, content: impl Into<String>, font_size: f64) -> Self {
        Self::new(ElementKind::Text {
            x,
            y,
            content: content.into(),
            font_size,
            anchor: TextAnchor::Start,
        })
    }

    pub fn image(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ElementKind::Image {
            x,
            y,
            width,
            height,
            href: None,
            intrinsic: None,
            preserve_aspect: false,
        })
    }

    pub fn path(segments: Vec<PathSegment>, stroke_width: f64) -> Self {
        Self::new(ElementKind::Path {
            segments,
            stroke_width,
        })
    }

    /// Build a path element from raw `d` attribute text.
    pub fn path_from_data(d: &str, stroke_width: f64) -> Self {
        Self::path(parse_path(d), stroke_width)
    }

    /// The element's box in parent coordinates: the kind's local box rule,
    /// mapped through the element's own transform, padded.
    ///
    /// Pure function of the current attributes; resolving caches its result
    /// but never feeds back into it.
    pub fn bounding_box(&self, measure: &dyn TextMeasure) -> BoundingBox {
        let local = match &self.kind {
            ElementKind::Group { children, .. } => {
                let mut bb: Option<BoundingBox> = None;
                for child in children {
                    let cb = child.bounding_box(measure);
                    bb = Some(match bb {
                        Some(acc) => acc.union(&cb),
                        None => cb,
                    });
                }
                bb.unwrap_or_default()
            }
            ElementKind::Rect {
                x,
                y,
                width,
                height,
            } => BoundingBox::from_origin_size(*x, *y, *width, *height),
            ElementKind::Line {
                x1,
                y1,
                x2,
                y2,
                stroke_width,
            } => line_box(*x1, *y1, *x2, *y2, *stroke_width),
            ElementKind::Circle { cx, cy, r } => {
                BoundingBox::new(cx - r, cy - r, cx + r, cy + r)
            }
            ElementKind::Text {
                x,
                y,
                content,
                font_size,
                anchor,
            } => text_box(*x, *y, content, *font_size, *anchor, measure),
            ElementKind::Image {
                x,
                y,
                width,
                height,
                intrinsic,
                preserve_aspect,
                ..
            } => image_box(*x, *y, *width, *height, *intrinsic, *preserve_aspect),
            ElementKind::Path {
                segments,
                stroke_width,
            } => {
                // Path candidates are transformed point by point, which is
                // tighter under rotation than transforming the folded box
                return pad(
                    path_bounds(segments, &self.transform, *stroke_width),
                    &self.padding,
                );
            }
        };
        pad(self.transform.apply_box(&local), &self.padding)
    }

    /// Compute and cache boxes for this element and, for containers, every
    /// descendant.
    pub fn resolve(&mut self, measure: &dyn TextMeasure) {
        if let ElementKind::Group { children, .. } = &mut self.kind {
            for child in children {
                child.resolve(measure);
            }
        }
        self.resolved = Some(self.bounding_box(measure));
    }

    pub fn resolved_box(&self) -> Option<BoundingBox> {
        self.resolved
    }

    /// Overwrite the cached box. Layout strategies use this to move an
    /// element; the transform is synced separately via [`Self::update_pos`].
    pub fn set_resolved_box(&mut self, bb: BoundingBox) {
        self.resolved = Some(bb);
    }

    /// Fold the difference between the cached box and its previous position
    /// into the transform, so recomputing the box reproduces the cache.
    pub fn update_pos(&mut self, old_minx: f64, old_miny: f64) {
        let Some(resolved) = self.resolved else {
            log::warn!(
                "update_pos on unresolved element {:?} has nothing to sync",
                self.id
            );
            return;
        };
        let dx = resolved.minx - old_minx;
        let dy = resolved.miny - old_miny;
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.transform = Matrix::translation(dx, dy).multiply(&self.transform);
    }

    /// Prepend a uniform scale. The factor is `max(sx, sy)` when both are
    /// at least 1, otherwise `min(sx, sy)`, so content is never distorted
    /// toward a degenerate aspect ratio. The cached box is scaled in step
    /// (about the origin) and the effective factor returned so callers can
    /// propagate it to visually paired elements.
    pub fn update_scale(&mut self, sx: f64, sy: f64) -> f64 {
        let effective = if sx >= 1.0 && sy >= 1.0 {
            sx.max(sy)
        } else {
            sx.min(sy)
        };
        if effective == 1.0 {
            return 1.0;
        }
        if effective <= 0.0 || !effective.is_finite() {
            log::warn!(
                "ignoring degenerate scale ({sx}, {sy}) on element {:?}",
                self.id
            );
            return 1.0;
        }
        self.transform = Matrix::scaling(effective, effective).multiply(&self.transform);
        if let Some(bb) = self.resolved {
            self.resolved = Some(BoundingBox::new(
                bb.minx * effective,
                bb.miny * effective,
                bb.maxx * effective,
                bb.maxy * effective,
            ));
        }
        effective
    }

    /// Immediate children, empty for atoms.
    pub fn children(&self) -> &[Element] {
        match &self.kind {
            ElementKind::Group { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        match &mut self.kind {
            ElementKind::Group { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Append a child. Atoms cannot own children; the attempt is dropped
    /// with a warning rather than panicking mid-pass.
    pub fn push_child(&mut self, child: Element) {
        match &mut self.kind {
            ElementKind::Group { children, .. } => children.push(child),
            _ => log::warn!(
                "dropping child {:?} appended to non-container element {:?}",
                child.id,
                self.id
            ),
        }
    }

    /// Look up an immediate child by id.
    pub fn find_child(&self, id: &str) -> Option<&Element> {
        self.children().iter().find(|c| c.id.as_deref() == Some(id))
    }

    pub fn find_child_mut(&mut self, id: &str) -> Option<&mut Element> {
        match &mut self.kind {
            ElementKind::Group { children, .. } => children
                .iter_mut()
                .find(|c| c.id.as_deref() == Some(id)),
            _ => None,
        }
    }

    /// Per-child boxes in this element's parent coordinates, for strategies
    /// that test overlap against container internals instead of one coarse
    /// box. Atoms yield their own box.
    pub fn children_boxes(&self, measure: &dyn TextMeasure) -> Vec<BoundingBox> {
        match &self.kind {
            ElementKind::Group { children, .. } => children
                .iter()
                .map(|c| self.transform.apply_box(&c.bounding_box(measure)))
                .collect(),
            _ => vec![self.bounding_box(measure)],
        }
    }

    pub fn layout_strategy(&self) -> Option<&LayoutStrategy> {
        match &self.kind {
            ElementKind::Group { layout, .. } => layout.as_ref(),
            _ => None,
        }
    }

    pub fn size_constraint(&self) -> Option<(&str, &SizeConstraint)> {
        match &self.kind {
            ElementKind::Group {
                constraint: Some(constraint),
                reference: Some(reference),
                ..
            } => Some((reference.as_str(), constraint)),
            _ => None,
        }
    }
}

/// A line's box: the endpoint envelope, widened by half the stroke width
/// along any degenerate axis so horizontal/vertical rules keep their ink.
fn line_box(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64) -> BoundingBox {
    let mut minx = x1.min(x2);
    let mut maxx = x1.max(x2);
    let mut miny = y1.min(y2);
    let mut maxy = y1.max(y2);
    let half = stroke_width / 2.0;
    if minx == maxx {
        minx -= half;
        maxx += half;
    }
    if miny == maxy {
        miny -= half;
        maxy += half;
    }
    BoundingBox::new(minx, miny, maxx, maxy)
}

/// An image's box: the declared rectangle, shrunk to the meet-fit of the
/// intrinsic aspect ratio and centered when `preserveAspectRatio` applies.
fn image_box(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    intrinsic: Option<(f64, f64)>,
    preserve_aspect: bool,
) -> BoundingBox {
    if preserve_aspect {
        if let Some((iw, ih)) = intrinsic {
            if iw > 0.0 && ih > 0.0 && width > 0.0 && height > 0.0 {
                let s = (width / iw).min(height / ih);
                let rw = iw * s;
                let rh = ih * s;
                return BoundingBox::from_origin_size(
                    x + (width - rw) / 2.0,
                    y + (height - rh) / 2.0,
                    rw,
                    rh,
                );
            }
        }
    }
    BoundingBox::from_origin_size(x, y, width, height)
}

fn pad(bb: BoundingBox, padding: &Padding) -> BoundingBox {
    if padding.is_zero() {
        return bb;
    }
    BoundingBox::new(
        bb.minx - padding.left,
        bb.miny - padding.top,
        bb.maxx + padding.right,
        bb.maxy + padding.bottom,
    )
}
