use crate::category::{SpanCategory, detect_category};
use crate::config::LayoutConfig;
use crate::layout::{self, LayoutMode};
use crate::span::{ChildIndex, Span, flatten_spans};
use crate::steps::{StepGroup, build_step_groups};
use serde::Serialize;

pub const START_NODE_ID: &str = "__start__";
pub const END_NODE_ID: &str = "__end__";

/// Caller-facing options, one field per recognized knob.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub layout_mode: LayoutMode,
    pub show_system_nodes: bool,
    pub group_by_step: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::Dagre,
            show_system_nodes: true,
            group_by_step: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemRole {
    Start,
    End,
}

/// Span-derived display metadata carried on every span node so the rendering
/// layer never reaches back into the raw span for labels.
#[derive(Debug, Clone, Serialize)]
pub struct SpanNodeData {
    pub span: Span,
    pub category: SpanCategory,
    pub duration_label: String,
    pub total_tokens: Option<u64>,
    pub cost: Option<f64>,
    pub has_error: bool,
    pub is_selected: bool,
    pub model_name: Option<String>,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Span(SpanNodeData),
    System { role: SystemRole, label: String },
}

/// A positioned graph node. Position is `(0, 0)` until a layout engine runs.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn is_system(&self) -> bool {
        matches!(self.kind, NodeKind::System { .. })
    }

    pub fn label(&self) -> &str {
        match &self.kind {
            NodeKind::Span(data) => data.span.name.as_str(),
            NodeKind::System { label, .. } => label.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: EdgeStyle,
    pub animated: bool,
}

impl GraphEdge {
    /// Edge identity derives from the endpoint pair, so rebuilding the graph
    /// from unchanged input yields identical ids and the renderer can diff
    /// frames without remounting.
    fn new(source: &str, target: &str, style: EdgeStyle, animated: bool) -> Self {
        Self {
            id: format!("{source}->{target}"),
            source: source.to_string(),
            target: target.to_string(),
            style,
            animated,
        }
    }
}

/// Pipeline output: positioned nodes, edges, and the temporal step grouping.
#[derive(Debug, Serialize)]
pub struct TraceGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub steps: Vec<StepGroup>,
}

impl TraceGraph {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Runs the whole pipeline: flatten, cluster into steps, derive nodes and
/// edges, position with the selected layout engine. Pure and synchronous;
/// empty input yields an empty graph, never an error. Callers guarantee
/// acyclic parent references and unique span ids.
pub fn build_trace_graph(
    roots: &[Span],
    selected_id: Option<&str>,
    options: &GraphOptions,
    config: &LayoutConfig,
) -> TraceGraph {
    let flat = flatten_spans(roots);
    if flat.is_empty() {
        return TraceGraph::empty();
    }

    let steps = build_step_groups(&flat);
    let index = ChildIndex::build(&flat);
    let edges = build_edges(&flat, &index, &steps, options);
    let mut nodes = build_nodes(&flat, selected_id, options);
    layout::compute_layout(&mut nodes, &edges, options.layout_mode, config);

    TraceGraph {
        nodes,
        edges,
        steps,
    }
}

/// One SpanNode per flat span, plus the two system markers when enabled.
/// Step grouping never affects the node set, only the edges.
pub fn build_nodes(
    flat: &[Span],
    selected_id: Option<&str>,
    options: &GraphOptions,
) -> Vec<GraphNode> {
    let mut nodes: Vec<GraphNode> = flat
        .iter()
        .map(|span| span_node(span, selected_id))
        .collect();

    if options.show_system_nodes {
        nodes.push(system_node(SystemRole::Start));
        nodes.push(system_node(SystemRole::End));
    }
    nodes
}

fn span_node(span: &Span, selected_id: Option<&str>) -> GraphNode {
    let data = SpanNodeData {
        category: detect_category(span),
        duration_label: format_duration_ms(span.duration_ms()),
        total_tokens: span.total_tokens(),
        cost: span.cost,
        has_error: span.error,
        is_selected: selected_id == Some(span.id.as_str()),
        model_name: span.model_name.clone(),
        status: if span.error { "error" } else { "ok" },
        span: span.clone(),
    };
    GraphNode {
        id: span.id.clone(),
        x: 0.0,
        y: 0.0,
        kind: NodeKind::Span(data),
    }
}

fn system_node(role: SystemRole) -> GraphNode {
    let (id, label) = match role {
        SystemRole::Start => (START_NODE_ID, "Start"),
        SystemRole::End => (END_NODE_ID, "End"),
    };
    GraphNode {
        id: id.to_string(),
        x: 0.0,
        y: 0.0,
        kind: NodeKind::System {
            role,
            label: label.to_string(),
        },
    }
}

/// Derives the edge set. Hierarchy edges (parent -> child) and bipartite
/// consecutive-step edges are mutually exclusive per call, selected by
/// `group_by_step`; the system connections bracket whichever view is active.
pub fn build_edges(
    flat: &[Span],
    index: &ChildIndex,
    steps: &[StepGroup],
    options: &GraphOptions,
) -> Vec<GraphEdge> {
    let mut edges = Vec::new();

    if options.group_by_step {
        // Left-to-right execution-order view: every span in step i connects
        // to every span in step i+1, discarding the call hierarchy.
        for window in steps.windows(2) {
            for from in &window[0].spans {
                for to in &window[1].spans {
                    edges.push(GraphEdge::new(&from.id, &to.id, EdgeStyle::Solid, true));
                }
            }
        }
    } else {
        for span in flat {
            if index.has_parent(span) {
                let parent_id = span.parent_id.as_deref().unwrap_or_default();
                edges.push(GraphEdge::new(parent_id, &span.id, EdgeStyle::Solid, false));
            }
        }
    }

    if options.show_system_nodes {
        if options.group_by_step {
            if let (Some(first), Some(last)) = (steps.first(), steps.last()) {
                for span in &first.spans {
                    edges.push(GraphEdge::new(
                        START_NODE_ID,
                        &span.id,
                        EdgeStyle::Dashed,
                        false,
                    ));
                }
                for span in &last.spans {
                    edges.push(GraphEdge::new(
                        &span.id,
                        END_NODE_ID,
                        EdgeStyle::Dashed,
                        false,
                    ));
                }
            }
        } else {
            for span in flat {
                if !index.has_parent(span) {
                    edges.push(GraphEdge::new(
                        START_NODE_ID,
                        &span.id,
                        EdgeStyle::Dashed,
                        false,
                    ));
                }
                if index.is_leaf(span) {
                    edges.push(GraphEdge::new(
                        &span.id,
                        END_NODE_ID,
                        EdgeStyle::Dashed,
                        false,
                    ));
                }
            }
        }
    }

    edges
}

/// Millisecond-rounded label, switching to seconds above one second.
fn format_duration_ms(ms: i64) -> String {
    if ms < 1_000 {
        format!("{ms}ms")
    } else {
        format!("{:.2}s", ms as f64 / 1_000.0)
    }
}
