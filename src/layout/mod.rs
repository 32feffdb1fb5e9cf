mod dagre;
mod force;

use crate::config::LayoutConfig;
use crate::graph::{GraphEdge, GraphNode};
use serde::{Deserialize, Serialize};

/// Layout strategy. Both engines share the `(nodes, edges) -> positions`
/// contract, so callers swap strategies without touching upstream stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Hierarchical leveled layout; deterministic for a fixed input ordering.
    Dagre,
    /// Iterative force simulation; pseudo-deterministic unless seeded.
    Physics,
}

impl LayoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dagre => "dagre",
            Self::Physics => "physics",
        }
    }
}

/// Assigns a 2D position to every node in place. Tolerates zero edges and a
/// single node; edges are caller-guaranteed acyclic.
pub fn compute_layout(
    nodes: &mut [GraphNode],
    edges: &[GraphEdge],
    mode: LayoutMode,
    config: &LayoutConfig,
) {
    if nodes.is_empty() {
        return;
    }
    match mode {
        LayoutMode::Dagre => dagre::assign_positions(nodes, edges, config),
        LayoutMode::Physics => force::assign_positions(nodes, edges, &config.physics),
    }
}

/// Fixed box for a node; system markers use the larger box.
pub(crate) fn node_size(node: &GraphNode, config: &LayoutConfig) -> (f32, f32) {
    if node.is_system() {
        (config.node.system_width, config.node.system_height)
    } else {
        (config.node.span_width, config.node.span_height)
    }
}
