//! collage - composes infographic documents out of independently built parts.
//!
//! A chart body, a title block, a topic icon, and decorative bars arrive as
//! separate pieces; this library computes where each piece must sit so that
//! nothing overlaps and every size constraint holds. The composition is
//! driven by a JSON template naming the parts and how they relate; the
//! result is a fully positioned element tree plus the viewport an external
//! SVG serializer should emit.
//!
//! # Example
//!
//! ```rust
//! use collage::{compose, DocumentContent, Element, TextSpec};
//!
//! let template = r#"{
//!     "tag": "g",
//!     "id": "root",
//!     "children": [
//!         {"tag": "g", "id": "title"},
//!         {"tag": "g", "id": "chart"}
//!     ],
//!     "layoutStrategy": {"name": "vertical", "padding": 12.0, "alignment": "middle"}
//! }"#;
//!
//! let content = DocumentContent::new()
//!     .with_text("title", TextSpec::new("Quarterly revenue by region", 18.0))
//!     .with_element("chart", Element::rect(0.0, 0.0, 320.0, 200.0));
//!
//! let doc = compose(template, &content).unwrap();
//! assert!(doc.width > 320.0);
//! let chart = doc.root.find_child("chart").unwrap();
//! assert!(chart.resolved_box().is_some());
//! ```

pub mod element;
pub mod geom;
pub mod layout;
pub mod metrics;
pub mod parser;
pub mod processor;
pub mod template;

pub use element::{Element, ElementKind, Padding, TextAnchor};
pub use geom::{BoundingBox, Matrix, Point};
pub use layout::{
    Alignment, CircularStrategy, LayoutError, LayoutGraph, LayoutStrategy, LinearDirection,
    LinearStrategy, LinearVariant, RadialDirection, RadialStrategy, RotationDirection,
    SizeConstraint,
};
pub use metrics::{FontMetrics, LineBreaker, MetricsError, TextExtent, TextMeasure};
pub use processor::{
    ComposedDocument, DocumentContent, ImageSpec, Processor, ProcessorConfig, TextSpec,
};
pub use template::{TemplateError, TemplateNode};

use thiserror::Error;

/// Errors that can occur during a composition pass
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The template failed to parse or validate
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// A constraint or strategy hit a fatal condition
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The font metrics table failed to load
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

/// Configuration for the complete composition pipeline
#[derive(Debug, Clone, Default)]
pub struct ComposeConfig {
    /// Glyph table used for text measurement
    pub metrics: FontMetrics,
    /// Processor tunables (margins, wrap limits, reserved ids)
    pub processor: ProcessorConfig,
}

impl ComposeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: FontMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_processor(mut self, config: ProcessorConfig) -> Self {
        self.processor = config;
        self
    }
}

/// Compose a document from a JSON template with default configuration.
///
/// Parses the template, fills reserved slots from `content`, runs the
/// layout pass, and returns the positioned tree with its viewport.
pub fn compose(template: &str, content: &DocumentContent) -> Result<ComposedDocument, ComposeError> {
    compose_with_config(template, content, &ComposeConfig::default())
}

/// Compose a document with custom metrics and processor configuration.
///
/// # Example
///
/// ```rust
/// use collage::{compose_with_config, ComposeConfig, DocumentContent, Element, ProcessorConfig};
///
/// let config = ComposeConfig::new()
///     .with_processor(ProcessorConfig {
///         margin: 8.0,
///         ..ProcessorConfig::default()
///     });
///
/// let template = r#"{"tag": "g", "children": [{"tag": "g", "id": "chart"}]}"#;
/// let content = DocumentContent::new()
///     .with_element("chart", Element::rect(0.0, 0.0, 100.0, 60.0));
///
/// let doc = compose_with_config(template, &content, &config).unwrap();
/// assert_eq!(doc.width, 116.0);
/// assert_eq!(doc.height, 76.0);
/// ```
pub fn compose_with_config(
    template: &str,
    content: &DocumentContent,
    config: &ComposeConfig,
) -> Result<ComposedDocument, ComposeError> {
    let tree = TemplateNode::from_json(template)?;
    let processor = Processor::new(&config.metrics, config.processor.clone());
    processor.process(&tree, content)
}
