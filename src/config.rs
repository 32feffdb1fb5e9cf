use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Ranks stack top to bottom.
    Td,
    /// Ranks read left to right, matching execution order.
    Lr,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TD" | "TB" => Some(Self::Td),
            "LR" => Some(Self::Lr),
            _ => None,
        }
    }

    pub fn rankdir(self) -> &'static str {
        match self {
            Self::Td => "TB",
            Self::Lr => "LR",
        }
    }
}

/// Fixed node boxes. System markers get the larger box so the entry and exit
/// points stay visually prominent at any zoom.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeGeometry {
    pub span_width: f32,
    pub span_height: f32,
    pub system_width: f32,
    pub system_height: f32,
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            span_width: 220.0,
            span_height: 80.0,
            system_width: 260.0,
            system_height: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DagreEngineConfig {
    pub direction: Direction,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for DagreEngineConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Lr,
            node_spacing: 60.0,
            rank_spacing: 120.0,
            margin_x: 8.0,
            margin_y: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Fixed iteration count; predictable latency over convergence.
    pub iterations: usize,
    pub link_distance: f32,
    pub link_strength: f32,
    pub repulsion: f32,
    /// Keeps the repulsion force bounded for near-coincident nodes.
    pub softening: f32,
    pub centering_strength: f32,
    pub damping: f32,
    pub max_step: f32,
    pub time_step: f32,
    /// Explicit seed for reproducible layouts; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1_200.0,
            canvas_height: 800.0,
            iterations: 300,
            link_distance: 160.0,
            link_strength: 0.6,
            repulsion: 30_000.0,
            softening: 100.0,
            centering_strength: 0.05,
            damping: 0.85,
            max_step: 40.0,
            time_step: 0.05,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node: NodeGeometry,
    pub dagre: DagreEngineConfig,
    pub physics: PhysicsConfig,
}

/// Loads a layout config file. Missing fields fall back to defaults; the
/// file is parsed leniently (JSON5: comments and trailing commas allowed).
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config: LayoutConfig = json5::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("invalid config file {}: {err}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens_parse() {
        assert_eq!(Direction::from_token("TD"), Some(Direction::Td));
        assert_eq!(Direction::from_token("TB"), Some(Direction::Td));
        assert_eq!(Direction::from_token("LR"), Some(Direction::Lr));
        assert_eq!(Direction::from_token("RL"), None);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: LayoutConfig =
            json5::from_str(r#"{ physics: { iterations: 50, seed: 7 } }"#).unwrap();
        assert_eq!(config.physics.iterations, 50);
        assert_eq!(config.physics.seed, Some(7));
        assert_eq!(config.dagre.node_spacing, 60.0);
        assert_eq!(config.node.span_width, 220.0);
    }
}
