use std::collections::HashSet;
use std::path::Path;

use trace_graph::graph::{END_NODE_ID, START_NODE_ID};
use trace_graph::{
    GraphOptions, LayoutConfig, LayoutMode, Span, build_trace_graph, parse_trace_document,
};

fn load_fixture(name: &str) -> Vec<Span> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_trace_document(&input).expect("fixture parse failed")
}

fn seeded_config() -> LayoutConfig {
    let mut config = LayoutConfig::default();
    config.physics.seed = Some(99);
    config
}

fn options(mode: LayoutMode, show_system_nodes: bool, group_by_step: bool) -> GraphOptions {
    GraphOptions {
        layout_mode: mode,
        show_system_nodes,
        group_by_step,
    }
}

fn assert_positions_finite(graph: &trace_graph::TraceGraph, fixture: &str) {
    for node in &graph.nodes {
        assert!(node.x.is_finite(), "{fixture}: non-finite x on {}", node.id);
        assert!(node.y.is_finite(), "{fixture}: non-finite y on {}", node.id);
    }
}

#[test]
fn nested_trace_hierarchy_view() {
    // root 0-100ms, child a 10-40ms, child b 50-90ms
    let roots = load_fixture("nested.json");
    let graph = build_trace_graph(
        &roots,
        None,
        &options(LayoutMode::Dagre, true, false),
        &seeded_config(),
    );

    assert_eq!(graph.nodes.len(), 5); // 3 spans + start + end
    let hierarchy: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.source != START_NODE_ID && e.target != END_NODE_ID)
        .collect();
    assert_eq!(hierarchy.len(), 2);
    assert_eq!(
        graph
            .edges
            .iter()
            .filter(|e| e.source == START_NODE_ID)
            .count(),
        1
    );
    assert_eq!(
        graph
            .edges
            .iter()
            .filter(|e| e.target == END_NODE_ID)
            .count(),
        2
    );
    // root's interval covers both children: a single step
    assert_eq!(graph.steps.len(), 1);
    assert_positions_finite(&graph, "nested.json");
}

#[test]
fn parallel_trace_step_boundaries() {
    // a 10:00:00-05, b 10:00:03-08 overlap; c starts exactly at 10:00:08
    let roots = load_fixture("parallel.json");
    let graph = build_trace_graph(
        &roots,
        None,
        &options(LayoutMode::Dagre, false, true),
        &seeded_config(),
    );

    assert_eq!(graph.steps.len(), 2);
    assert_eq!(graph.steps[0].spans.len(), 2);
    assert_eq!(graph.steps[1].spans.len(), 1);
    assert_eq!(graph.steps[1].spans[0].id, "c");
    // bipartite between consecutive steps: 2 x 1
    assert_eq!(graph.edges.len(), 2);
    assert!(graph.edges.iter().all(|e| e.animated));
    assert_positions_finite(&graph, "parallel.json");
}

#[test]
fn step_partition_covers_every_span() {
    let roots = load_fixture("agent_run.json");
    let graph = build_trace_graph(
        &roots,
        None,
        &options(LayoutMode::Dagre, false, false),
        &seeded_config(),
    );

    let span_count = graph
        .nodes
        .iter()
        .filter(|n| n.id != START_NODE_ID && n.id != END_NODE_ID)
        .count();
    let grouped: Vec<&str> = graph
        .steps
        .iter()
        .flat_map(|g| g.spans.iter().map(|s| s.id.as_str()))
        .collect();
    assert_eq!(grouped.len(), span_count);
    let unique: HashSet<&&str> = grouped.iter().collect();
    assert_eq!(unique.len(), span_count);
    // the workflow root covers the whole trace, so everything overlaps it
    assert_eq!(graph.steps.len(), 1);
}

#[test]
fn edge_ids_stable_across_invocations() {
    let roots = load_fixture("agent_run.json");
    let run = || {
        build_trace_graph(
            &roots,
            None,
            &options(LayoutMode::Dagre, true, false),
            &seeded_config(),
        )
    };
    let first: HashSet<String> = run().edges.into_iter().map(|e| e.id).collect();
    let second: HashSet<String> = run().edges.into_iter().map(|e| e.id).collect();
    assert_eq!(first, second);
}

#[test]
fn both_layout_modes_cover_all_nodes() {
    let roots = load_fixture("agent_run.json");
    for mode in [LayoutMode::Dagre, LayoutMode::Physics] {
        let graph = build_trace_graph(
            &roots,
            None,
            &options(mode, true, false),
            &seeded_config(),
        );
        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len(), "{mode:?}: duplicate node");
        assert_positions_finite(&graph, "agent_run.json");
    }
}

#[test]
fn single_span_trace_is_degenerate_but_valid() {
    let roots = load_fixture("single.json");
    for mode in [LayoutMode::Dagre, LayoutMode::Physics] {
        let graph = build_trace_graph(
            &roots,
            None,
            &options(mode, false, false),
            &seeded_config(),
        );
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.steps.len(), 1);
        assert_positions_finite(&graph, "single.json");
    }
}

#[test]
fn selection_marks_exactly_one_node() {
    let roots = load_fixture("agent_run.json");
    let graph = build_trace_graph(
        &roots,
        Some("llm-1"),
        &options(LayoutMode::Dagre, false, false),
        &seeded_config(),
    );
    let selected: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| match &n.kind {
            trace_graph::graph::NodeKind::Span(data) => data.is_selected,
            _ => false,
        })
        .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, "llm-1");
}
