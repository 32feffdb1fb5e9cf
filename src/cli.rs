use crate::config::load_config;
use crate::dump::write_graph_dump;
use crate::graph::{GraphOptions, build_trace_graph};
use crate::layout::LayoutMode;
use crate::span::parse_trace_document;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "tracegraph",
    version,
    about = "Trace span graph builder (step clustering + dagre/physics layout)"
)]
pub struct Args {
    /// Input trace JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output graph JSON file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout engine
    #[arg(short = 'l', long = "layout", value_enum, default_value = "dagre")]
    pub layout: LayoutArg,

    /// Replace hierarchy edges with step-transition edges
    #[arg(long = "group-by-step")]
    pub group_by_step: bool,

    /// Add synthetic __start__/__end__ marker nodes
    #[arg(long = "show-system-nodes")]
    pub show_system_nodes: bool,

    /// Id of the currently selected span
    #[arg(short = 's', long = "selected")]
    pub selected: Option<String>,

    /// Seed for the physics engine's initial placement
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Config JSON file (layout tuning constants)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LayoutArg {
    Dagre,
    Physics,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Dagre => LayoutMode::Dagre,
            LayoutArg::Physics => LayoutMode::Physics,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.physics.seed = args.seed;
    }

    let input = read_input(args.input.as_deref())?;
    let roots = parse_trace_document(&input)?;

    let options = GraphOptions {
        layout_mode: args.layout.into(),
        show_system_nodes: args.show_system_nodes,
        group_by_step: args.group_by_step,
    };
    let graph = build_trace_graph(&roots, args.selected.as_deref(), &options, &config);
    write_graph_dump(args.output.as_deref(), &graph, options.layout_mode)?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
