//! The strategy vocabulary and dispatch.
//!
//! A [`LayoutStrategy`] places one element relative to another: the
//! *reference* is already positioned, the *target* gets a new resolved box.
//! Strategies are stateless across calls; everything a placement needs is
//! passed in. Application mutates only the target's cached bounding box, so
//! the caller is responsible for syncing the transform afterward with
//! [`crate::element::Element::update_pos`].

use crate::element::Element;
use crate::metrics::TextMeasure;

use super::circular::CircularStrategy;
use super::linear::LinearStrategy;
use super::radial::RadialStrategy;
use super::LayoutError;

/// Cross-axis alignment of a linear placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Start,
    Middle,
    End,
}

impl Alignment {
    /// Parse the template vocabulary. Unrecognized values are a configuration
    /// error, so this returns `None` rather than defaulting.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start" => Some(Alignment::Start),
            "middle" => Some(Alignment::Middle),
            "end" => Some(Alignment::End),
            _ => None,
        }
    }
}

/// The closed set of placement strategies.
#[derive(Debug, Clone)]
pub enum LayoutStrategy {
    Linear(LinearStrategy),
    Radial(RadialStrategy),
    Circular(CircularStrategy),
}

impl LayoutStrategy {
    /// Place `target` relative to `reference`, mutating the target's
    /// resolved box only.
    pub fn apply(
        &self,
        reference: &Element,
        target: &mut Element,
        measure: &dyn TextMeasure,
    ) -> Result<(), LayoutError> {
        match self {
            LayoutStrategy::Linear(s) => s.apply(reference, target, measure),
            LayoutStrategy::Radial(s) => s.apply(reference, target, measure),
            LayoutStrategy::Circular(s) => s.apply(reference, target, measure),
        }
    }

    /// The template-vocabulary name, including the linear variant.
    pub fn name(&self) -> &'static str {
        match self {
            LayoutStrategy::Linear(s) => s.name(),
            LayoutStrategy::Radial(_) => "radial",
            LayoutStrategy::Circular(_) => "circular",
        }
    }

    pub fn direction(&self) -> &'static str {
        match self {
            LayoutStrategy::Linear(s) => s.direction.as_str(),
            LayoutStrategy::Radial(s) => s.direction.as_str(),
            LayoutStrategy::Circular(s) => s.direction.as_str(),
        }
    }

    /// Whether two strategies count as the same chain link for splicing:
    /// same name and same direction.
    pub fn same_flavor(&self, other: &LayoutStrategy) -> bool {
        self.name() == other.name() && self.direction() == other.direction()
    }
}
