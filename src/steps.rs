use crate::span::Span;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A cluster of spans whose time intervals mutually overlap, i.e. spans that
/// executed concurrently. `end_time` is the max effective end observed among
/// members.
#[derive(Debug, Clone, Serialize)]
pub struct StepGroup {
    pub step: usize,
    pub spans: Vec<Span>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Greedy single-pass interval clustering over spans sorted by start time.
///
/// A span joins the open group iff its start is strictly before the group's
/// running max end time; otherwise it seeds the next group. The strict `<`
/// means a span starting exactly when the open group ends begins a new step
/// (boundary ties favor sequencing, not parallel grouping). Spans with no end
/// time are point events: they still extend the running end to at least their
/// own start. Cost is O(n log n), dominated by the sort.
pub fn build_step_groups(spans: &[Span]) -> Vec<StepGroup> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&Span> = spans.iter().collect();
    // stable, so equal start times keep their original relative order
    sorted.sort_by_key(|span| span.start_time);

    let mut groups: Vec<StepGroup> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_end: DateTime<Utc> = sorted[0].effective_end();

    for span in sorted {
        if current.is_empty() || span.start_time < current_end {
            current_end = current_end.max(span.effective_end());
            current.push(span.clone());
        } else {
            groups.push(close_group(groups.len(), current, current_end));
            current_end = span.effective_end();
            current = vec![span.clone()];
        }
    }
    groups.push(close_group(groups.len(), current, current_end));
    groups
}

fn close_group(step: usize, spans: Vec<Span>, end_time: DateTime<Utc>) -> StepGroup {
    let start_time = spans
        .iter()
        .map(|span| span.start_time)
        .min()
        .unwrap_or(end_time);
    StepGroup {
        step,
        spans,
        start_time,
        end_time,
    }
}
