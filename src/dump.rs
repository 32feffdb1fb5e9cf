use crate::graph::{GraphNode, NodeKind, TraceGraph};
use crate::layout::LayoutMode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Flat, renderer-facing serialization of a [`TraceGraph`].
#[derive(Debug, Serialize)]
pub struct GraphDump {
    pub layout: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub step_count: usize,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub steps: Vec<StepDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub total_tokens: Option<u64>,
    pub cost: Option<f64>,
    pub error: bool,
    pub selected: bool,
    pub model: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: String,
    pub animated: bool,
}

#[derive(Debug, Serialize)]
pub struct StepDump {
    pub step: usize,
    pub span_ids: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl GraphDump {
    pub fn from_graph(graph: &TraceGraph, mode: LayoutMode) -> Self {
        let nodes: Vec<NodeDump> = graph.nodes.iter().map(node_dump).collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                style: format!("{:?}", edge.style).to_lowercase(),
                animated: edge.animated,
            })
            .collect();

        let steps = graph
            .steps
            .iter()
            .map(|group| StepDump {
                step: group.step,
                span_ids: group.spans.iter().map(|span| span.id.clone()).collect(),
                start_time: group.start_time,
                end_time: group.end_time,
            })
            .collect();

        GraphDump {
            layout: mode.as_str().to_string(),
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            step_count: graph.steps.len(),
            nodes,
            edges,
            steps,
        }
    }
}

fn node_dump(node: &GraphNode) -> NodeDump {
    match &node.kind {
        NodeKind::Span(data) => NodeDump {
            id: node.id.clone(),
            kind: "span".to_string(),
            label: data.span.name.clone(),
            x: node.x,
            y: node.y,
            category: Some(data.category.as_str().to_string()),
            duration: Some(data.duration_label.clone()),
            total_tokens: data.total_tokens,
            cost: data.cost,
            error: data.has_error,
            selected: data.is_selected,
            model: data.model_name.clone(),
            status: Some(data.status.to_string()),
        },
        NodeKind::System { role, label } => NodeDump {
            id: node.id.clone(),
            kind: format!("{role:?}").to_lowercase(),
            label: label.clone(),
            x: node.x,
            y: node.y,
            category: None,
            duration: None,
            total_tokens: None,
            cost: None,
            error: false,
            selected: false,
            model: None,
            status: None,
        },
    }
}

/// Writes the dump as pretty JSON to the given path, or stdout when omitted.
pub fn write_graph_dump(
    path: Option<&Path>,
    graph: &TraceGraph,
    mode: LayoutMode,
) -> anyhow::Result<()> {
    let dump = GraphDump::from_graph(graph, mode);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.write_all(b"\n")?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &dump)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}
