//! Reference placement scenarios with hand-computed expected geometry.

use pretty_assertions::assert_eq;

use collage::layout::{EdgeValue, LayoutGraph};
use collage::{
    CircularStrategy, Element, FontMetrics, LayoutStrategy, LinearDirection, LinearStrategy,
    LinearVariant, Point, RadialDirection, RadialStrategy, RotationDirection, SizeConstraint,
};

const TOLERANCE: f64 = 0.01;

fn metrics() -> FontMetrics {
    FontMetrics::default()
}

fn resolved_rect(minx: f64, miny: f64, width: f64, height: f64) -> Element {
    let mut el = Element::rect(minx, miny, width, height);
    el.resolve(&metrics());
    el
}

#[test]
fn radial_outer_with_padding() {
    let reference = resolved_rect(0.0, 0.0, 2.0, 2.0);
    let mut target = resolved_rect(100.0, 100.0, 2.0, 2.0);

    let strategy = LayoutStrategy::Radial(RadialStrategy {
        direction: RadialDirection::Outer,
        padding: 5.0,
        center: Point::new(-1.0, 1.0),
        overlap: false,
    });
    strategy.apply(&reference, &mut target, &metrics()).unwrap();

    let bb = target.resolved_box().unwrap();
    // Boundary scale 2 doubles the center distance; padding 5 over distance
    // 2 adds another 2.5, landing the center at (8, 1)
    assert!((bb.minx - 7.0).abs() < TOLERANCE, "minx {}", bb.minx);
    assert!((bb.miny - 0.0).abs() < TOLERANCE, "miny {}", bb.miny);
    assert!(!reference.resolved_box().unwrap().is_overlapping(&bb));
}

#[test]
fn radial_inner_reflects_through_center() {
    let reference = resolved_rect(-2.0, 0.0, 2.0, 2.0);
    let mut target = resolved_rect(50.0, 50.0, 2.0, 2.0);

    let strategy = LayoutStrategy::Radial(RadialStrategy {
        direction: RadialDirection::Inner,
        padding: 0.0,
        center: Point::new(0.0, 0.0),
        overlap: false,
    });
    strategy.apply(&reference, &mut target, &metrics()).unwrap();

    let bb = target.resolved_box().unwrap();
    assert!((bb.minx - 0.0).abs() < TOLERANCE, "minx {}", bb.minx);
    assert!((bb.miny + 2.0).abs() < TOLERANCE, "miny {}", bb.miny);
    assert!(!reference.resolved_box().unwrap().is_overlapping(&bb));
}

#[test]
fn circular_anticlock_with_padding() {
    let reference = resolved_rect(0.0, 0.0, 2.0, 2.0);
    let mut target = resolved_rect(30.0, 30.0, 2.0, 2.0);

    let strategy = LayoutStrategy::Circular(CircularStrategy {
        direction: RotationDirection::Anticlock,
        padding: std::f64::consts::FRAC_PI_6 * 2.0,
        center: Point::new(-1.0, 1.0),
        overlap: false,
    });
    strategy.apply(&reference, &mut target, &metrics()).unwrap();

    let bb = target.resolved_box().unwrap();
    // Boundary angle pi/2 plus pi/6 of padding rotation: the center lands
    // at (-2, 1 + sqrt(3))
    assert!((bb.minx + 3.0).abs() < TOLERANCE, "minx {}", bb.minx);
    assert!((bb.miny - 3.0_f64.sqrt()).abs() < TOLERANCE, "miny {}", bb.miny);
}

#[test]
fn circular_clock_far_center_degenerates_to_vertical() {
    let reference = resolved_rect(0.0, 0.0, 2.0, 2.0);
    let mut target = resolved_rect(30.0, 30.0, 2.0, 2.0);

    // A center effectively at infinity to the left: rotating about it moves
    // the target along a vertical line, so the placement reduces to sliding
    // the box just above the reference.
    let strategy = LayoutStrategy::Circular(CircularStrategy {
        direction: RotationDirection::Clock,
        padding: 0.0,
        center: Point::new(-1e36, 1.0),
        overlap: false,
    });
    strategy.apply(&reference, &mut target, &metrics()).unwrap();

    let bb = target.resolved_box().unwrap();
    assert!((bb.minx - 0.0).abs() < TOLERANCE, "minx {}", bb.minx);
    assert!((bb.miny + 2.0).abs() < TOLERANCE, "miny {}", bb.miny);
}

#[test]
fn max_width_constraint_rescales_uniformly() {
    let reference = resolved_rect(0.0, 0.0, 100.0, 80.0);
    let mut target = resolved_rect(0.0, 0.0, 200.0, 40.0);

    let constraint = SizeConstraint {
        max_width_ratio: Some(0.5),
        ..SizeConstraint::default()
    };
    let scale = constraint
        .rescale(&reference.resolved_box().unwrap(), &mut target)
        .unwrap();
    assert!((scale - 0.25).abs() < 1e-9);

    let bb = target.resolved_box().unwrap();
    assert!((bb.width() - 50.0).abs() < 1e-9);
    // Uniform scale carries the height along
    assert!((bb.height() - 10.0).abs() < 1e-9);
}

#[test]
fn splice_preserves_chain_order() {
    let vertical = || {
        EdgeValue::Strategy(LayoutStrategy::Linear(LinearStrategy {
            direction: LinearDirection::Down,
            variant: LinearVariant::Edge,
            padding: 0.0,
            offset: 0.0,
            alignment: collage::Alignment::Start,
            overlap: false,
        }))
    };

    let mut graph = LayoutGraph::new();
    let title = graph.add_node("title");
    let subtitle = graph.add_node("subtitle");
    graph.add_edge(title, subtitle, vertical());

    let icon = graph.add_node("topic_icon");
    graph.add_node_with_edges(title, icon, vertical());

    assert!(graph.contains_edge(title, icon));
    assert!(graph.contains_edge(icon, subtitle));
    assert!(!graph.contains_edge(title, subtitle));

    let chain = graph.strategy_chain(&[title, subtitle, icon]);
    let hops: Vec<(&str, &str)> = chain
        .iter()
        .map(|&e| {
            let edge = graph.edge(e).unwrap();
            (graph.element_id(edge.source), graph.element_id(edge.target))
        })
        .collect();
    assert_eq!(hops, vec![("title", "topic_icon"), ("topic_icon", "subtitle")]);
}
