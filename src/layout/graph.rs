//! The dependency graph that sequences constraint and strategy evaluation.
//!
//! Nodes stand for elements (by id); a directed edge runs from a *reference*
//! node to the *layout* node it positions or sizes, carrying the strategy or
//! constraint to apply. The graph lives for one layout pass: the processor
//! creates nodes and edges while walking the template tree, evaluates them,
//! and drops the whole graph when the pass completes.
//!
//! [`LayoutGraph::add_node_with_edges`] is the splice operation: it inserts
//! an optional node (a topic icon, say) into the middle of an existing
//! sibling chain without the caller having to know the chain's prior shape.

use std::collections::HashMap;

use super::constraint::SizeConstraint;
use super::strategy::LayoutStrategy;

/// Handle to a node in the graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Handle to an edge in the graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeId(usize);

/// What an edge applies to its layout node.
#[derive(Debug, Clone)]
pub enum EdgeValue {
    Strategy(LayoutStrategy),
    Constraint(SizeConstraint),
}

impl EdgeValue {
    pub fn strategy(&self) -> Option<&LayoutStrategy> {
        match self {
            EdgeValue::Strategy(s) => Some(s),
            EdgeValue::Constraint(_) => None,
        }
    }
}

#[derive(Debug)]
struct GraphNode {
    element: String,
    prevs: Vec<EdgeId>,
    nexts: Vec<EdgeId>,
}

/// A directed edge from a reference node to the node it lays out.
#[derive(Debug)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub value: EdgeValue,
    // Positions inside the endpoint adjacency lists, kept in sync so
    // removal is O(1).
    source_slot: usize,
    target_slot: usize,
}

#[derive(Debug, Default)]
pub struct LayoutGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<Option<GraphEdge>>,
    index: HashMap<String, NodeId>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for an element id, or return the existing one.
    pub fn add_node(&mut self, element_id: impl Into<String>) -> NodeId {
        let key = element_id.into();
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            element: key.clone(),
            prevs: Vec::new(),
            nexts: Vec::new(),
        });
        self.index.insert(key, id);
        id
    }

    /// Add a node for an element without an id. The generated key never
    /// collides with template ids.
    pub fn add_anonymous_node(&mut self) -> NodeId {
        let key = format!("~anon{}", self.nodes.len());
        self.add_node(key)
    }

    pub fn node_id(&self, element_id: &str) -> Option<NodeId> {
        self.index.get(element_id).copied()
    }

    pub fn element_id(&self, node: NodeId) -> &str {
        &self.nodes[node.0].element
    }

    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id.0).and_then(|e| e.as_ref())
    }

    /// Live outgoing edges of a node, in insertion order.
    pub fn outgoing(&self, node: NodeId) -> Vec<EdgeId> {
        self.nodes[node.0].nexts.clone()
    }

    /// Live incoming edges of a node, in insertion order.
    pub fn incoming(&self, node: NodeId) -> Vec<EdgeId> {
        self.nodes[node.0].prevs.clone()
    }

    /// Whether a node has no edges at all.
    pub fn is_unconnected(&self, node: NodeId) -> bool {
        self.nodes[node.0].prevs.is_empty() && self.nodes[node.0].nexts.is_empty()
    }

    /// Whether a node is part of any strategy chain. Constraint edges do not
    /// count: a node that has only been size-constrained is still free to be
    /// spliced into a sibling chain.
    pub fn is_chained(&self, node: NodeId) -> bool {
        self.nodes[node.0]
            .prevs
            .iter()
            .chain(self.nodes[node.0].nexts.iter())
            .any(|&e| self.edge(e).map_or(false, |edge| edge.value.strategy().is_some()))
    }

    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.nodes[source.0]
            .nexts
            .iter()
            .any(|&e| self.edge(e).map_or(false, |edge| edge.target == target))
    }

    /// Append an edge to both endpoint adjacency lists.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, value: EdgeValue) -> EdgeId {
        let id = EdgeId(self.edges.len());
        let source_slot = self.nodes[source.0].nexts.len();
        let target_slot = self.nodes[target.0].prevs.len();
        self.nodes[source.0].nexts.push(id);
        self.nodes[target.0].prevs.push(id);
        self.edges.push(Some(GraphEdge {
            source,
            target,
            value,
            source_slot,
            target_slot,
        }));
        id
    }

    /// Remove an edge, returning its value. O(1): the stored slots locate
    /// the adjacency entries, and the swapped-in entries get their slots
    /// fixed up.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<EdgeValue> {
        let edge = self.edges.get_mut(id.0)?.take()?;

        let nexts = &mut self.nodes[edge.source.0].nexts;
        nexts.swap_remove(edge.source_slot);
        if let Some(&moved) = nexts.get(edge.source_slot) {
            if let Some(m) = self.edges[moved.0].as_mut() {
                m.source_slot = edge.source_slot;
            }
        }

        let prevs = &mut self.nodes[edge.target.0].prevs;
        prevs.swap_remove(edge.target_slot);
        if let Some(&moved) = prevs.get(edge.target_slot) {
            if let Some(m) = self.edges[moved.0].as_mut() {
                m.target_slot = edge.target_slot;
            }
        }

        Some(edge.value)
    }

    /// Add an edge, splicing new nodes into an existing chain when possible.
    ///
    /// If the edge carries a strategy and the target is not yet part of any
    /// chain while the source already has an outgoing edge of the same
    /// strategy flavor (name and direction), that edge is re-routed to leave
    /// from the target instead, so the target lands in the middle of the
    /// chain. Symmetrically, an unchained source steals a same-flavor
    /// incoming edge of the target.
    pub fn add_node_with_edges(
        &mut self,
        source: NodeId,
        target: NodeId,
        value: EdgeValue,
    ) -> EdgeId {
        if let EdgeValue::Strategy(strategy) = &value {
            if !self.is_chained(target) {
                if let Some(old) = self.find_flavor_edge(self.outgoing(source), strategy) {
                    let next = self.edge(old).map(|e| e.target);
                    if let (Some(next), Some(v)) = (next, self.remove_edge(old)) {
                        self.add_edge(target, next, v);
                    }
                }
            } else if !self.is_chained(source) {
                if let Some(old) = self.find_flavor_edge(self.incoming(target), strategy) {
                    let prev = self.edge(old).map(|e| e.source);
                    if let (Some(prev), Some(v)) = (prev, self.remove_edge(old)) {
                        self.add_edge(prev, source, v);
                    }
                }
            }
        }
        self.add_edge(source, target, value)
    }

    fn find_flavor_edge(&self, candidates: Vec<EdgeId>, strategy: &LayoutStrategy) -> Option<EdgeId> {
        candidates.into_iter().find(|&e| {
            self.edge(e)
                .and_then(|edge| edge.value.strategy())
                .map_or(false, |s| s.same_flavor(strategy))
        })
    }

    /// The strategy edges among `members`, ordered head to tail along the
    /// sibling chain. The head is the member with no strategy edge arriving
    /// from another member.
    pub fn strategy_chain(&self, members: &[NodeId]) -> Vec<EdgeId> {
        let is_member = |n: NodeId| members.contains(&n);
        let head = members.iter().copied().find(|&n| {
            !self.incoming(n).iter().any(|&e| {
                self.edge(e).map_or(false, |edge| {
                    edge.value.strategy().is_some() && is_member(edge.source)
                })
            })
        });

        let mut chain = Vec::new();
        let Some(mut cursor) = head else {
            return chain;
        };
        while chain.len() <= members.len() {
            let next = self.outgoing(cursor).into_iter().find(|&e| {
                self.edge(e).map_or(false, |edge| {
                    edge.value.strategy().is_some() && is_member(edge.target)
                })
            });
            match next {
                Some(e) => {
                    chain.push(e);
                    cursor = self.edge(e).map(|edge| edge.target).unwrap_or(cursor);
                }
                None => break,
            }
        }
        chain
    }

    /// Live constraint edges leaving a node, in insertion order.
    pub fn constraint_edges(&self, source: NodeId) -> Vec<EdgeId> {
        self.outgoing(source)
            .into_iter()
            .filter(|&e| {
                self.edge(e)
                    .map_or(false, |edge| matches!(edge.value, EdgeValue::Constraint(_)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::layout::{
        Alignment, LinearDirection, LinearStrategy, LinearVariant, RadialDirection,
        RadialStrategy,
    };

    fn vertical_down() -> EdgeValue {
        EdgeValue::Strategy(LayoutStrategy::Linear(LinearStrategy {
            direction: LinearDirection::Down,
            variant: LinearVariant::Edge,
            padding: 0.0,
            offset: 0.0,
            alignment: Alignment::Start,
            overlap: false,
        }))
    }

    fn radial_outer() -> EdgeValue {
        EdgeValue::Strategy(LayoutStrategy::Radial(RadialStrategy {
            direction: RadialDirection::Outer,
            padding: 0.0,
            center: Point::new(0.0, 0.0),
            overlap: false,
        }))
    }

    #[test]
    fn test_add_node_reuses_existing() {
        let mut graph = LayoutGraph::new();
        let a = graph.add_node("title");
        let b = graph.add_node("title");
        assert_eq!(a, b);
        assert_eq!(graph.element_id(a), "title");
    }

    #[test]
    fn test_add_edge_links_both_sides() {
        let mut graph = LayoutGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let e = graph.add_edge(a, b, vertical_down());
        assert_eq!(graph.outgoing(a), vec![e]);
        assert_eq!(graph.incoming(b), vec![e]);
        assert!(graph.contains_edge(a, b));
    }

    #[test]
    fn test_remove_edge_fixes_swapped_slots() {
        let mut graph = LayoutGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let ab = graph.add_edge(a, b, vertical_down());
        let ac = graph.add_edge(a, c, vertical_down());

        // Removing the first outgoing edge swaps the second into its slot;
        // a later removal must still unlink cleanly.
        assert!(graph.remove_edge(ab).is_some());
        assert!(!graph.contains_edge(a, b));
        assert!(graph.contains_edge(a, c));
        assert!(graph.remove_edge(ac).is_some());
        assert!(graph.is_unconnected(a));
        assert!(graph.is_unconnected(c));
    }

    #[test]
    fn test_splice_inserts_between_chain_links() {
        let mut graph = LayoutGraph::new();
        let title = graph.add_node("title");
        let subtitle = graph.add_node("subtitle");
        graph.add_edge(title, subtitle, vertical_down());

        let icon = graph.add_node("topic_icon");
        graph.add_node_with_edges(title, icon, vertical_down());

        assert!(graph.contains_edge(title, icon));
        assert!(graph.contains_edge(icon, subtitle));
        assert!(
            !graph.contains_edge(title, subtitle),
            "the spliced-over edge must be gone"
        );
    }

    #[test]
    fn test_splice_symmetric_for_new_source() {
        let mut graph = LayoutGraph::new();
        let title = graph.add_node("title");
        let subtitle = graph.add_node("subtitle");
        graph.add_edge(title, subtitle, vertical_down());

        // The new node arrives as the source of the edge this time.
        let icon = graph.add_node("topic_icon");
        graph.add_node_with_edges(icon, subtitle, vertical_down());

        assert!(graph.contains_edge(title, icon));
        assert!(graph.contains_edge(icon, subtitle));
        assert!(!graph.contains_edge(title, subtitle));
    }

    #[test]
    fn test_splice_requires_matching_flavor() {
        let mut graph = LayoutGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        graph.add_edge(a, b, vertical_down());

        let c = graph.add_node("c");
        graph.add_node_with_edges(a, c, radial_outer());

        // Different strategy: no splice, the old edge stays.
        assert!(graph.contains_edge(a, b));
        assert!(graph.contains_edge(a, c));
        assert!(!graph.contains_edge(c, b));
    }

    #[test]
    fn test_no_splice_when_both_connected() {
        let mut graph = LayoutGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        graph.add_edge(a, b, vertical_down());
        graph.add_edge(b, c, vertical_down());

        graph.add_node_with_edges(a, c, vertical_down());
        assert!(graph.contains_edge(a, b), "connected endpoints add plainly");
        assert!(graph.contains_edge(a, c));
    }

    #[test]
    fn test_strategy_chain_order() {
        let mut graph = LayoutGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        graph.add_edge(a, b, vertical_down());
        let icon = graph.add_node("icon");
        graph.add_node_with_edges(b, icon, vertical_down());
        graph.add_edge(icon, c, vertical_down());

        let members = vec![a, b, c, icon];
        let chain = graph.strategy_chain(&members);
        let hops: Vec<(&str, &str)> = chain
            .iter()
            .map(|&e| {
                let edge = graph.edge(e).unwrap();
                (graph.element_id(edge.source), graph.element_id(edge.target))
            })
            .collect();
        assert_eq!(
            hops,
            vec![("a", "b"), ("b", "icon"), ("icon", "c")],
            "evaluation follows the spliced chain"
        );
    }

    #[test]
    fn test_constraint_edges_filtered() {
        let mut graph = LayoutGraph::new();
        let reference = graph.add_node("chart");
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        graph.add_edge(reference, a, EdgeValue::Constraint(SizeConstraint::default()));
        graph.add_edge(reference, b, vertical_down());
        let constraints = graph.constraint_edges(reference);
        assert_eq!(constraints.len(), 1);
        assert_eq!(
            graph.element_id(graph.edge(constraints[0]).unwrap().target),
            "a"
        );
    }

    #[test]
    fn test_anonymous_nodes_unique() {
        let mut graph = LayoutGraph::new();
        let a = graph.add_anonymous_node();
        let b = graph.add_anonymous_node();
        assert_ne!(a, b);
    }
}
