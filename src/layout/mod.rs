//! Placement machinery: strategies that position one element relative to
//! another, size constraints, and the graph that sequences their evaluation.

pub mod config;
pub mod overlap;

mod circular;
mod constraint;
mod error;
mod graph;
mod linear;
mod radial;
mod strategy;

pub use circular::{CircularStrategy, RotationDirection};
pub use constraint::SizeConstraint;
pub use error::LayoutError;
pub use graph::{EdgeId, EdgeValue, GraphEdge, LayoutGraph, NodeId};
pub use linear::{LinearDirection, LinearStrategy, LinearVariant};
pub use radial::{RadialDirection, RadialStrategy};
pub use strategy::{Alignment, LayoutStrategy};
