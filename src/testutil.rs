use crate::span::Span;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

fn at(offset_ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_760_000_000_000 + offset_ms).unwrap()
}

/// Leaf span with millisecond offsets from a fixed trace epoch.
pub fn span_at(id: &str, name: &str, start_ms: i64, end_ms: i64) -> Span {
    Span {
        id: id.to_string(),
        parent_id: None,
        name: name.to_string(),
        start_time: at(start_ms),
        end_time: Some(at(end_ms)),
        cost: None,
        input_tokens: None,
        output_tokens: None,
        error: false,
        model_name: None,
        provider: None,
        attributes: BTreeMap::new(),
        child_spans: Vec::new(),
    }
}

/// Nested span with children pre-wired to point back at it.
pub fn span_tree(id: &str, start_ms: i64, end_ms: i64, mut children: Vec<Span>) -> Span {
    for child in &mut children {
        child.parent_id = Some(id.to_string());
    }
    let mut span = span_at(id, id, start_ms, end_ms);
    span.child_spans = children;
    span
}
