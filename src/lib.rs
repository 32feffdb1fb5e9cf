pub mod category;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dump;
pub mod graph;
pub mod layout;
pub mod span;
pub mod steps;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, load_config};
pub use graph::{GraphOptions, TraceGraph, build_trace_graph};
pub use layout::LayoutMode;
pub use span::{Span, flatten_spans, parse_trace_document};
pub use steps::{StepGroup, build_step_groups};
