use crate::config::LayoutConfig;
use crate::graph::{GraphEdge, GraphNode};
use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use std::collections::HashSet;

/// Leveled layout: ranks from the directed edge set, crossing-minimized order
/// within a rank, fixed per-node boxes. dagre's layout is deterministic for a
/// fixed node/edge insertion order, so the caller's ordering is preserved via
/// the `order` hint.
pub(super) fn assign_positions(nodes: &mut [GraphNode], edges: &[GraphEdge], config: &LayoutConfig) {
    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    // dagre_rust only matches lowercase rankdir tokens ("lr"/"tb")
    graph_config.rankdir = Some(config.dagre.direction.rankdir().to_lowercase());
    graph_config.nodesep = Some(config.dagre.node_spacing);
    graph_config.ranksep = Some(config.dagre.rank_spacing);
    graph_config.marginx = Some(config.dagre.margin_x);
    graph_config.marginy = Some(config.dagre.margin_y);
    dagre_graph.set_graph(graph_config);

    for (order, node) in nodes.iter().enumerate() {
        let (width, height) = super::node_size(node, config);
        let mut dagre_node = DagreNode::default();
        dagre_node.width = width;
        dagre_node.height = height;
        dagre_node.order = Some(order);
        dagre_graph.set_node(node.id.clone(), Some(dagre_node));
    }

    let mut edge_set: HashSet<(&str, &str)> = HashSet::new();
    for edge in edges {
        if !edge_set.insert((edge.source.as_str(), edge.target.as_str())) {
            continue;
        }
        let _ = dagre_graph.set_edge(&edge.source, &edge.target, Some(DagreEdge::default()), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    for node in nodes.iter_mut() {
        let Some(dagre_node) = dagre_graph.node(&node.id) else {
            continue;
        };
        let (width, height) = super::node_size(node, config);
        // dagre reports centers; the contract hands out top-left corners
        node.x = dagre_node.x - width / 2.0;
        node.y = dagre_node.y - height / 2.0;
        if !node.x.is_finite() {
            node.x = 0.0;
        }
        if !node.y.is_finite() {
            node.y = 0.0;
        }
    }
}
