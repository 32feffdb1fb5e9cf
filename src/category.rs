use crate::span::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Visual category of a span, driving node styling in the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanCategory {
    Llm,
    Agent,
    Batch,
    Conversation,
    Pipeline,
    Worker,
    Api,
    Generic,
}

impl SpanCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Agent => "agent",
            Self::Batch => "batch",
            Self::Conversation => "conversation",
            Self::Pipeline => "pipeline",
            Self::Worker => "worker",
            Self::Api => "api",
            Self::Generic => "generic",
        }
    }
}

static CONVERSATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(chat|conversation)([._:-]|$)").unwrap());

static WORKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|[._:-])(worker|job)([._:-]|$|\d)").unwrap());

/// Operation names emitted by the pipeline runner for its own phases.
const PIPELINE_OPERATIONS: [&str; 5] = [
    "pipeline",
    "chain",
    "workflow",
    "ingest",
    "retrieve",
];

const HTTP_ATTRIBUTES: [&str; 4] = ["http.method", "http.url", "http.route", "http.status_code"];

/// Classifies a span from name and attribute heuristics. The checks run in a
/// fixed order and the first match wins; reordering them changes results for
/// spans matching several rules (an LLM call inside a worker must stay `llm`).
pub fn detect_category(span: &Span) -> SpanCategory {
    let name = span.name.to_ascii_lowercase();

    if span.model_name.is_some()
        || span.provider.is_some()
        || name.starts_with("llm")
        || name.contains("generation")
    {
        return SpanCategory::Llm;
    }
    if name.starts_with("agent") {
        return SpanCategory::Agent;
    }
    if name.starts_with("batch") {
        return SpanCategory::Batch;
    }
    if CONVERSATION_RE.is_match(&span.name) {
        return SpanCategory::Conversation;
    }
    if PIPELINE_OPERATIONS
        .iter()
        .any(|op| name == *op || name.starts_with(&format!("{op}.")))
    {
        return SpanCategory::Pipeline;
    }
    if WORKER_RE.is_match(&span.name) {
        return SpanCategory::Worker;
    }
    if HTTP_ATTRIBUTES
        .iter()
        .any(|key| span.attributes.contains_key(*key))
    {
        return SpanCategory::Api;
    }
    SpanCategory::Generic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::span_at;

    #[test]
    fn model_name_wins_over_name_rules() {
        let mut span = span_at("s", "agent.plan", 0, 10);
        span.model_name = Some("gpt-4o".to_string());
        assert_eq!(detect_category(&span), SpanCategory::Llm);
    }

    #[test]
    fn name_prefixes_in_rule_order() {
        assert_eq!(
            detect_category(&span_at("s", "llm.completion", 0, 1)),
            SpanCategory::Llm
        );
        assert_eq!(
            detect_category(&span_at("s", "agent_loop", 0, 1)),
            SpanCategory::Agent
        );
        assert_eq!(
            detect_category(&span_at("s", "batch-embed", 0, 1)),
            SpanCategory::Batch
        );
        assert_eq!(
            detect_category(&span_at("s", "chat.turn", 0, 1)),
            SpanCategory::Conversation
        );
        assert_eq!(
            detect_category(&span_at("s", "workflow.run", 0, 1)),
            SpanCategory::Pipeline
        );
        assert_eq!(
            detect_category(&span_at("s", "queue.worker.3", 0, 1)),
            SpanCategory::Worker
        );
    }

    #[test]
    fn http_attributes_classify_as_api() {
        let mut span = span_at("s", "fetch_profile", 0, 5);
        span.attributes
            .insert("http.method".to_string(), serde_json::json!("GET"));
        assert_eq!(detect_category(&span), SpanCategory::Api);
    }

    #[test]
    fn unmatched_span_is_generic() {
        assert_eq!(
            detect_category(&span_at("s", "load_settings", 0, 1)),
            SpanCategory::Generic
        );
    }
}
