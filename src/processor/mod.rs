//! The layout processor: one synchronous pass from template to geometry.
//!
//! The processor walks a [`TemplateNode`] tree once. Reserved ids mark slots
//! it fills from collaborator-supplied [`DocumentContent`]; every other node
//! becomes a plain element of its tag's kind. After building the tree it
//! resolves all boxes, then lays out each container bottom-up: size the
//! topic icon against its siblings, evaluate size-constraint edges from the
//! declared reference child, evaluate strategy edges along the sibling
//! chain, and recompute the container's own box. The single [`LayoutGraph`]
//! lives exactly as long as the pass and is never shared across passes.

mod textblock;

pub use textblock::{break_text, build_text_block, greedy_wrap};

use std::collections::HashMap;

use crate::element::{Element, ElementKind};
use crate::geom::{arc_anchors, Matrix, Point};
use crate::layout::{EdgeValue, LayoutError, LayoutGraph, NodeId};
use crate::metrics::{LineBreaker, TextMeasure};
use crate::template::TemplateNode;
use crate::ComposeError;

/// Which element ids the processor treats as content slots.
#[derive(Debug, Clone)]
pub struct ReservedIds {
    pub title: String,
    pub subtitle: String,
    pub chart: String,
    pub embellish: String,
    pub topic_icon: String,
}

impl Default for ReservedIds {
    fn default() -> Self {
        Self {
            title: "title".into(),
            subtitle: "subtitle".into(),
            chart: "chart".into(),
            embellish: "embellish".into(),
            topic_icon: "topic_icon".into(),
        }
    }
}

/// Tunables for one composition pass.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Whitespace around the composed document on every side.
    pub margin: f64,
    /// Width budget for wrapping title and subtitle text.
    pub max_text_width: f64,
    /// Upper bound on title/subtitle display lines.
    pub max_lines: usize,
    /// Lines shorter than this borrow a word from the next line.
    pub min_line_chars: usize,
    /// Vertical gap between stacked text lines.
    pub line_spacing: f64,
    /// Decorative bar geometry for `embellish` slots.
    pub bar_width: f64,
    pub bar_height: f64,
    /// Topic icon height as a fraction of the tallest sibling.
    pub icon_ratio: f64,
    pub reserved: ReservedIds,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            max_text_width: 300.0,
            max_lines: 3,
            min_line_chars: 10,
            line_spacing: 4.0,
            bar_width: 300.0,
            bar_height: 6.0,
            icon_ratio: 1.0,
            reserved: ReservedIds::default(),
        }
    }
}

/// Heading text for a title or subtitle slot.
#[derive(Debug, Clone)]
pub struct TextSpec {
    pub text: String,
    pub font_size: f64,
}

impl TextSpec {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// Image metadata for a topic icon slot. Intrinsic pixel dimensions enable
/// aspect correction when the icon is scaled.
#[derive(Debug, Clone)]
pub struct ImageSpec {
    pub href: String,
    pub width: f64,
    pub height: f64,
    pub intrinsic: Option<(f64, f64)>,
}

impl ImageSpec {
    pub fn new(href: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            href: href.into(),
            width,
            height,
            intrinsic: None,
        }
    }

    pub fn with_intrinsic(mut self, width: f64, height: f64) -> Self {
        self.intrinsic = Some((width, height));
        self
    }
}

/// Collaborator-supplied content, keyed by the template ids it fills.
#[derive(Debug, Clone, Default)]
pub struct DocumentContent {
    elements: HashMap<String, Element>,
    texts: HashMap<String, TextSpec>,
    images: HashMap<String, ImageSpec>,
}

impl DocumentContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a pre-built element subtree (typically the chart body).
    pub fn with_element(mut self, id: impl Into<String>, element: Element) -> Self {
        self.elements.insert(id.into(), element);
        self
    }

    pub fn with_text(mut self, id: impl Into<String>, spec: TextSpec) -> Self {
        self.texts.insert(id.into(), spec);
        self
    }

    pub fn with_image(mut self, id: impl Into<String>, spec: ImageSpec) -> Self {
        self.images.insert(id.into(), spec);
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&TextSpec> {
        self.texts.get(id)
    }

    pub fn image(&self, id: &str) -> Option<&ImageSpec> {
        self.images.get(id)
    }
}

/// The finished composition: a fully positioned tree plus the viewport an
/// external serializer should emit.
#[derive(Debug, Clone)]
pub struct ComposedDocument {
    pub root: Element,
    pub width: f64,
    pub height: f64,
}

/// One-pass layout driver. Borrows its collaborators for the lifetime of
/// the pass; owns nothing that outlives it except configuration.
pub struct Processor<'a> {
    measure: &'a dyn TextMeasure,
    breaker: Option<&'a dyn LineBreaker>,
    config: ProcessorConfig,
}

impl<'a> Processor<'a> {
    pub fn new(measure: &'a dyn TextMeasure, config: ProcessorConfig) -> Self {
        Self {
            measure,
            breaker: None,
            config,
        }
    }

    pub fn with_line_breaker(mut self, breaker: &'a dyn LineBreaker) -> Self {
        self.breaker = Some(breaker);
        self
    }

    /// Run the whole pass: build the tree from the template, lay out every
    /// container bottom-up, and normalize the root to the margin.
    pub fn process(
        &self,
        template: &TemplateNode,
        content: &DocumentContent,
    ) -> Result<ComposedDocument, ComposeError> {
        let mut root = self.resolve_node(template, content)?;
        root.resolve(self.measure);

        let mut graph = LayoutGraph::new();
        self.layout_node(template, &mut root, &mut graph)?;

        self.finalize(root)
    }

    /// Build the element for one template node. Content lookup wins over the
    /// tag so a collaborator can override any slot; reserved ids without
    /// content are built by the role builders; everything else is a plain
    /// element of the tag's kind.
    fn resolve_node(
        &self,
        node: &TemplateNode,
        content: &DocumentContent,
    ) -> Result<Element, ComposeError> {
        let tag = node.tag()?;
        if let Some(id) = &node.id {
            if let Some(element) = content.element(id) {
                return Ok(element.clone().with_id(id.clone()));
            }
            let reserved = &self.config.reserved;
            if *id == reserved.title || *id == reserved.subtitle {
                let spec = content
                    .text(id)
                    .ok_or_else(|| LayoutError::missing_content(id.clone()))?;
                return Ok(build_text_block(
                    id,
                    spec,
                    &self.config,
                    self.measure,
                    self.breaker,
                )?);
            }
            if *id == reserved.embellish {
                return Ok(
                    Element::rect(0.0, 0.0, self.config.bar_width, self.config.bar_height)
                        .with_id(id.clone()),
                );
            }
            if *id == reserved.topic_icon {
                let spec = content
                    .image(id)
                    .ok_or_else(|| LayoutError::missing_content(id.clone()))?;
                let mut icon = Element::image(0.0, 0.0, spec.width, spec.height);
                if let ElementKind::Image {
                    href,
                    intrinsic,
                    preserve_aspect,
                    ..
                } = &mut icon.kind
                {
                    *href = Some(spec.href.clone());
                    *intrinsic = spec.intrinsic;
                    *preserve_aspect = spec.intrinsic.is_some();
                }
                return Ok(icon.with_id(id.clone()));
            }
            if *id == reserved.chart {
                return Err(LayoutError::missing_content(id.clone()).into());
            }
        }

        let mut element = tag.instantiate();
        if let Some(id) = &node.id {
            element = element.with_id(id.clone());
        }
        for child in &node.children {
            element.push_child(self.resolve_node(child, content)?);
        }
        Ok(element)
    }

    /// Post-order layout: children settle before their container's edges
    /// run, so every strategy sees final child geometry.
    fn layout_node(
        &self,
        node: &TemplateNode,
        element: &mut Element,
        graph: &mut LayoutGraph,
    ) -> Result<(), ComposeError> {
        if node.children.is_empty() {
            return Ok(());
        }
        if let Some(children) = element.children_mut() {
            for (child_node, child) in node.children.iter().zip(children.iter_mut()) {
                self.layout_node(child_node, child, graph)?;
            }
        }
        self.layout_container(node, element, graph)
    }

    fn layout_container(
        &self,
        node: &TemplateNode,
        element: &mut Element,
        graph: &mut LayoutGraph,
    ) -> Result<(), ComposeError> {
        {
            let reserved_icon = self.config.reserved.topic_icon.clone();
            let Some(children) = element.children_mut() else {
                return Ok(());
            };
            if children.len() > 1 {
                let icon_idx = children
                    .iter()
                    .position(|c| c.id.as_deref() == Some(reserved_icon.as_str()));

                self.size_topic_icon(children, icon_idx);
                self.apply_constraints(node, children, graph)?;
                self.apply_strategies(node, children, icon_idx, graph)?;
            }
        }

        let bb = element.bounding_box(self.measure);
        element.set_resolved_box(bb);
        Ok(())
    }

    /// Sibling sizing rule for the topic icon: scale it to the tallest
    /// sibling's height (times the configured ratio) before any edges run.
    fn size_topic_icon(&self, children: &mut [Element], icon_idx: Option<usize>) {
        let Some(icon_idx) = icon_idx else { return };
        let tallest = children
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != icon_idx)
            .filter_map(|(_, c)| c.resolved_box())
            .map(|b| b.height())
            .fold(0.0_f64, f64::max);
        let target_height = tallest * self.config.icon_ratio;
        if target_height <= 0.0 {
            return;
        }
        let icon = &mut children[icon_idx];
        match icon.resolved_box() {
            Some(bb) if bb.height() > 0.0 => {
                let s = target_height / bb.height();
                icon.update_scale(s, s);
            }
            _ => log::warn!("topic icon has no measurable height, leaving size as-is"),
        }
    }

    /// Add constraint edges from the declared reference child to every other
    /// child and evaluate them.
    fn apply_constraints(
        &self,
        node: &TemplateNode,
        children: &mut [Element],
        graph: &mut LayoutGraph,
    ) -> Result<(), ComposeError> {
        let Some(desc) = &node.size_constraint else {
            return Ok(());
        };
        let constraint = desc.build();
        if constraint.is_empty() {
            return Ok(());
        }
        let ref_idx = children
            .iter()
            .position(|c| c.id.as_deref() == Some(desc.reference.as_str()))
            .ok_or_else(|| LayoutError::missing_reference(node.label(), &desc.reference))?;
        let ref_box = children[ref_idx]
            .resolved_box()
            .ok_or_else(|| LayoutError::unresolved(children[ref_idx].id.as_deref()))?;

        let ids = register_children(children, graph);
        let mut edges = Vec::new();
        for (i, &nid) in ids.iter().enumerate() {
            if i != ref_idx {
                edges.push(graph.add_edge(
                    ids[ref_idx],
                    nid,
                    EdgeValue::Constraint(constraint.clone()),
                ));
            }
        }
        for edge_id in edges {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            let target = edge.target;
            let EdgeValue::Constraint(c) = edge.value.clone() else {
                continue;
            };
            if let Some(idx) = ids.iter().position(|&n| n == target) {
                let scale = c.rescale(&ref_box, &mut children[idx])?;
                if scale != 1.0 {
                    log::debug!(
                        "constraint from '{}' rescaled {:?} by {scale:.4}",
                        desc.reference,
                        children[idx].id
                    );
                }
            }
        }
        Ok(())
    }

    /// Add strategy edges pairwise along the sibling chain, splicing the
    /// topic icon in via the graph, then evaluate the chain in order.
    fn apply_strategies(
        &self,
        node: &TemplateNode,
        children: &mut [Element],
        icon_idx: Option<usize>,
        graph: &mut LayoutGraph,
    ) -> Result<(), ComposeError> {
        let Some(desc) = &node.layout_strategy else {
            return Ok(());
        };
        let fallback = derive_arc_center(children);
        let strategy = desc.build(node.label(), fallback)?;
        let ids = register_children(children, graph);

        // Pairwise edges between consecutive non-icon siblings; the icon is
        // inserted afterward so the splice re-links the chain around it.
        let members: Vec<usize> = (0..children.len())
            .filter(|&i| Some(i) != icon_idx)
            .collect();
        for pair in members.windows(2) {
            graph.add_edge(
                ids[pair[0]],
                ids[pair[1]],
                EdgeValue::Strategy(strategy.clone()),
            );
        }
        if let Some(icon_idx) = icon_idx {
            if icon_idx > 0 {
                graph.add_node_with_edges(
                    ids[icon_idx - 1],
                    ids[icon_idx],
                    EdgeValue::Strategy(strategy.clone()),
                );
            } else {
                graph.add_node_with_edges(
                    ids[icon_idx],
                    ids[icon_idx + 1],
                    EdgeValue::Strategy(strategy.clone()),
                );
            }
        }

        for edge_id in graph.strategy_chain(&ids) {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            let (src, tgt) = (edge.source, edge.target);
            let EdgeValue::Strategy(s) = edge.value.clone() else {
                continue;
            };
            let (Some(si), Some(ti)) = (
                ids.iter().position(|&n| n == src),
                ids.iter().position(|&n| n == tgt),
            ) else {
                continue;
            };
            let (reference, target) = pair_mut(children, si, ti);
            let old = target
                .resolved_box()
                .ok_or_else(|| LayoutError::unresolved(target.id.as_deref()))?;
            s.apply(reference, target, self.measure)?;
            target.update_pos(old.minx, old.miny);
        }
        Ok(())
    }

    /// Translate the root so content starts at the margin; the viewport is
    /// the content box plus the margin on all sides.
    fn finalize(&self, mut root: Element) -> Result<ComposedDocument, ComposeError> {
        let bb = root
            .resolved_box()
            .ok_or_else(|| LayoutError::unresolved(root.id.as_deref()))?;
        let margin = self.config.margin;
        root.set_resolved_box(bb.translated(margin - bb.minx, margin - bb.miny));
        root.update_pos(bb.minx, bb.miny);
        Ok(ComposedDocument {
            root,
            width: bb.width() + 2.0 * margin,
            height: bb.height() + 2.0 * margin,
        })
    }
}

/// Graph nodes for a container's children, in declaration order. Children
/// with ids key by id so edges added in separate steps land on the same
/// node; anonymous children get fresh nodes.
fn register_children(children: &[Element], graph: &mut LayoutGraph) -> Vec<NodeId> {
    children
        .iter()
        .map(|child| match &child.id {
            Some(id) => graph.add_node(id.clone()),
            None => graph.add_anonymous_node(),
        })
        .collect()
}

/// Disjoint reference/target borrows of two siblings.
fn pair_mut(children: &mut [Element], i: usize, j: usize) -> (&Element, &mut Element) {
    if i < j {
        let (head, tail) = children.split_at_mut(j);
        (&head[i], &mut tail[0])
    } else {
        let (head, tail) = children.split_at_mut(i);
        (&tail[0], &mut head[j])
    }
}

/// A center for radial/circular descriptors that omit one, derived from the
/// first arc found among the children (typically the chart's ring).
fn derive_arc_center(children: &[Element]) -> Option<Point> {
    children
        .iter()
        .find_map(|child| arc_center_of(child, &Matrix::IDENTITY))
}

fn arc_center_of(element: &Element, outer: &Matrix) -> Option<Point> {
    let local = outer.multiply(&element.transform);
    if let ElementKind::Path { segments, .. } = &element.kind {
        if let Some(anchor) = arc_anchors(segments, &local).into_iter().next() {
            return Some(anchor.center);
        }
    }
    element
        .children()
        .iter()
        .find_map(|child| arc_center_of(child, &local))
}
