use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// One recorded unit of work within a trace. The nested `child_spans` list is
/// the convenience format the data source hands over; everything downstream
/// operates on the flattened form produced by [`flatten_spans`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub child_spans: Vec<Span>,
}

impl Span {
    /// End of the span's interval. A span with no end time is a point event
    /// at its own start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_time.unwrap_or(self.start_time)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.effective_end() - self.start_time)
            .num_milliseconds()
            .max(0)
    }

    /// Combined token count, only when both sides were reported.
    pub fn total_tokens(&self) -> Option<u64> {
        match (self.input_tokens, self.output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TraceDocumentError {
    #[error("failed to read trace input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid trace JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("trace document must be a span array or an object with a `spans` field")]
    Shape,
}

/// Wire shape accepted from the data-fetching layer: either a bare array of
/// root spans or an object carrying them under `spans`.
pub fn parse_trace_document(input: &str) -> Result<Vec<Span>, TraceDocumentError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    match value {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(mut object) => {
            let spans = object.remove("spans").ok_or(TraceDocumentError::Shape)?;
            if !spans.is_array() {
                return Err(TraceDocumentError::Shape);
            }
            Ok(serde_json::from_value(spans)?)
        }
        _ => Err(TraceDocumentError::Shape),
    }
}

/// Flattens a tree of root spans into pre-order (parent before children,
/// children before the parent's next sibling). Each clone in the output has
/// its `child_spans` emptied so no span's children belong to two trees.
/// Cyclic parent references are caller-guaranteed absent.
pub fn flatten_spans(roots: &[Span]) -> Vec<Span> {
    let mut flat = Vec::new();
    for root in roots {
        flatten_into(root, &mut flat);
    }
    flat
}

fn flatten_into(span: &Span, out: &mut Vec<Span>) {
    let mut clone = span.clone();
    clone.child_spans = Vec::new();
    out.push(clone);
    for child in &span.child_spans {
        flatten_into(child, out);
    }
}

/// Adjacency built once per call over the flattened span list, so the step
/// grouper and edge builder iterate flat instead of recursing.
#[derive(Debug)]
pub struct ChildIndex {
    ids: HashSet<String>,
    children: HashMap<String, Vec<usize>>,
}

impl ChildIndex {
    pub fn build(flat: &[Span]) -> Self {
        let ids: HashSet<String> = flat.iter().map(|span| span.id.clone()).collect();
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, span) in flat.iter().enumerate() {
            let Some(parent_id) = span.parent_id.as_deref() else {
                continue;
            };
            if !ids.contains(parent_id) {
                continue;
            }
            children.entry(parent_id.to_string()).or_default().push(idx);
        }
        Self { ids, children }
    }

    /// True when the span's parent id resolves to another span in the set.
    /// Spans with dangling parent ids count as roots.
    pub fn has_parent(&self, span: &Span) -> bool {
        span.parent_id
            .as_deref()
            .map(|parent_id| self.ids.contains(parent_id))
            .unwrap_or(false)
    }

    pub fn is_leaf(&self, span: &Span) -> bool {
        !self.children.contains_key(&span.id)
    }

    pub fn children_of(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}
