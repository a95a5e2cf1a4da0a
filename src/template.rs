//! The composition template: a serialized skeleton of the desired document.
//!
//! A template mirrors the output tree shape. Node tags map one to one onto
//! element kinds, reserved ids (`title`, `chart`, ...) mark slots the
//! processor fills from collaborator-supplied content, and the optional
//! `layoutStrategy` / `sizeConstraint` descriptors say how a container's
//! children relate. Descriptor validation is strict: a misspelled strategy
//! name or alignment aborts the pass instead of silently falling back,
//! because the resulting geometry would be wrong in ways that are hard to
//! spot downstream.

use serde::Deserialize;
use thiserror::Error;

use crate::element::Element;
use crate::geom::Point;
use crate::layout::{
    Alignment, CircularStrategy, LayoutStrategy, LinearDirection, LinearStrategy,
    LinearVariant, RadialDirection, RadialStrategy, RotationDirection, SizeConstraint,
};

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("unknown template tag '{tag}' on node {id:?}")]
    UnknownTag { tag: String, id: Option<String> },
    #[error("unknown layout strategy '{name}' on node '{id}'")]
    UnknownStrategy { name: String, id: String },
    #[error("direction '{direction}' is not valid for '{name}' on node '{id}'")]
    UnknownDirection {
        name: String,
        direction: String,
        id: String,
    },
    #[error("unknown alignment '{alignment}' on node '{id}'")]
    UnknownAlignment { alignment: String, id: String },
    #[error("offset is not supported by '{name}' on node '{id}'")]
    UnsupportedOffset { name: String, id: String },
    #[error("'{name}' on node '{id}' needs a center and none could be derived")]
    MissingCenter { name: String, id: String },
    #[error("failed to parse template JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One node of the template tree. The wire (JSON) names for the descriptor
/// fields are `layoutStrategy` and `sizeConstraint`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateNode {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    #[serde(default)]
    pub layout_strategy: Option<StrategyDesc>,
    #[serde(default)]
    pub size_constraint: Option<ConstraintDesc>,
}

impl TemplateNode {
    pub fn from_json(text: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn tag(&self) -> Result<ElementTag, TemplateError> {
        ElementTag::parse(&self.tag, self.id.as_deref())
    }

    /// The name used in error messages: the id when present, the tag
    /// otherwise.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.tag)
    }
}

/// The closed tag vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTag {
    Group,
    Rect,
    Line,
    Circle,
    Text,
    Path,
    Image,
}

impl ElementTag {
    pub fn parse(tag: &str, id: Option<&str>) -> Result<Self, TemplateError> {
        match tag {
            "g" => Ok(ElementTag::Group),
            "rect" => Ok(ElementTag::Rect),
            "line" => Ok(ElementTag::Line),
            "circle" => Ok(ElementTag::Circle),
            "text" => Ok(ElementTag::Text),
            "path" => Ok(ElementTag::Path),
            "image" => Ok(ElementTag::Image),
            _ => Err(TemplateError::UnknownTag {
                tag: tag.to_string(),
                id: id.map(String::from),
            }),
        }
    }

    /// A zero-geometry element of this kind, for template slots the caller
    /// does not supply content for.
    pub fn instantiate(&self) -> Element {
        match self {
            ElementTag::Group => Element::group(Vec::new()),
            ElementTag::Rect => Element::rect(0.0, 0.0, 0.0, 0.0),
            ElementTag::Line => Element::line(0.0, 0.0, 0.0, 0.0, 1.0),
            ElementTag::Circle => Element::circle(0.0, 0.0, 0.0),
            ElementTag::Text => Element::text(0.0, 0.0, "", 12.0),
            ElementTag::Path => Element::path(Vec::new(), 0.0),
            ElementTag::Image => Element::image(0.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Serialized strategy descriptor, validated into a [`LayoutStrategy`].
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyDesc {
    pub name: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub padding: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub overlap: bool,
    #[serde(default)]
    pub center: Option<[f64; 2]>,
}

impl StrategyDesc {
    /// Validate and convert. `node_id` names the owning template node in
    /// errors. `fallback_center` is the center derived from the reference's
    /// arc anchors, used by radial/circular descriptors that omit their own.
    pub fn build(
        &self,
        node_id: &str,
        fallback_center: Option<Point>,
    ) -> Result<LayoutStrategy, TemplateError> {
        match self.name.as_str() {
            "vertical" | "horizontal" | "vertical_inner" | "horizontal_inner"
            | "vertical_middle" | "horizontal_middle" => self.build_linear(node_id),
            "radial" => {
                self.reject_offset(node_id)?;
                let direction = match self.direction.as_deref() {
                    None | Some("outer") => RadialDirection::Outer,
                    Some("inner") => RadialDirection::Inner,
                    Some(other) => return Err(self.unknown_direction(other, node_id)),
                };
                Ok(LayoutStrategy::Radial(RadialStrategy {
                    direction,
                    padding: self.padding,
                    center: self.center_or(fallback_center, node_id)?,
                    overlap: self.overlap,
                }))
            }
            "circular" => {
                self.reject_offset(node_id)?;
                let direction = match self.direction.as_deref() {
                    None | Some("clock") => RotationDirection::Clock,
                    Some("anticlock") => RotationDirection::Anticlock,
                    Some(other) => return Err(self.unknown_direction(other, node_id)),
                };
                Ok(LayoutStrategy::Circular(CircularStrategy {
                    direction,
                    padding: self.padding,
                    center: self.center_or(fallback_center, node_id)?,
                    overlap: self.overlap,
                }))
            }
            other => Err(TemplateError::UnknownStrategy {
                name: other.to_string(),
                id: node_id.to_string(),
            }),
        }
    }

    fn build_linear(&self, node_id: &str) -> Result<LayoutStrategy, TemplateError> {
        let vertical = self.name.starts_with("vertical");
        let variant = match self.name.split('_').nth(1) {
            None => LinearVariant::Edge,
            Some("inner") => LinearVariant::Inner,
            Some("middle") => LinearVariant::Middle,
            // Unreachable given the caller's name match, kept total
            Some(_) => {
                return Err(TemplateError::UnknownStrategy {
                    name: self.name.clone(),
                    id: node_id.to_string(),
                })
            }
        };
        let direction = match (vertical, self.direction.as_deref()) {
            (true, None) | (true, Some("down")) => LinearDirection::Down,
            (true, Some("up")) => LinearDirection::Up,
            (false, None) | (false, Some("right")) => LinearDirection::Right,
            (false, Some("left")) => LinearDirection::Left,
            (_, Some(other)) => return Err(self.unknown_direction(other, node_id)),
        };
        let alignment = match self.alignment.as_deref() {
            None => Alignment::Start,
            Some(text) => Alignment::parse(text).ok_or_else(|| TemplateError::UnknownAlignment {
                alignment: text.to_string(),
                id: node_id.to_string(),
            })?,
        };
        Ok(LayoutStrategy::Linear(LinearStrategy {
            direction,
            variant,
            padding: self.padding,
            offset: self.offset,
            alignment,
            overlap: self.overlap,
        }))
    }

    fn unknown_direction(&self, direction: &str, node_id: &str) -> TemplateError {
        TemplateError::UnknownDirection {
            name: self.name.clone(),
            direction: direction.to_string(),
            id: node_id.to_string(),
        }
    }

    fn reject_offset(&self, node_id: &str) -> Result<(), TemplateError> {
        if self.offset != 0.0 {
            return Err(TemplateError::UnsupportedOffset {
                name: self.name.clone(),
                id: node_id.to_string(),
            });
        }
        Ok(())
    }

    fn center_or(
        &self,
        fallback: Option<Point>,
        node_id: &str,
    ) -> Result<Point, TemplateError> {
        if let Some([x, y]) = self.center {
            return Ok(Point::new(x, y));
        }
        fallback.ok_or_else(|| TemplateError::MissingCenter {
            name: self.name.clone(),
            id: node_id.to_string(),
        })
    }
}

/// Serialized size constraint descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintDesc {
    pub reference: String,
    #[serde(default)]
    pub max_width: Option<f64>,
    #[serde(default)]
    pub max_height: Option<f64>,
    #[serde(default)]
    pub min_width: Option<f64>,
    #[serde(default)]
    pub min_height: Option<f64>,
}

impl ConstraintDesc {
    pub fn build(&self) -> SizeConstraint {
        SizeConstraint {
            max_width_ratio: self.max_width,
            max_height_ratio: self.max_height,
            min_width_ratio: self.min_width,
            min_height_ratio: self.min_height,
        }
    }
}
