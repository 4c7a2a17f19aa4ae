//! Configuration types for the layout run and the graph input.
//!
//! Two files feed the command-line driver:
//!
//! - [`LayoutConfig`] – YAML, every field optional, defaults give the stock
//!   layout look
//! - [`GraphFile`]    – JSON `{ nodes: [{id, data}], links: [{source, target}] }`
//!
//! # YAML format
//!
//! ```yaml
//! simulation:
//!   spring_length: 110.0     # rest length of a link
//!   spring_coeff: 1.0e-6     # Hooke stiffness
//!   gravity: -2.0            # negative -> nodes push each other apart
//!   theta: 0.1               # Barnes–Hut opening threshold, (0, 1]
//!   drag_coeff: 0.3          # velocity drag
//!   time_step: 1.0           # fixed dt
//!   barnes_hut: true         # false -> exact O(n^2) repulsion
//!
//! interaction:
//!   auto_cycle_secs: 5.0     # auto highlight interval
//!
//! camera:
//!   fov_degrees: 75.0
//!   framing_radius: 100.0
//!
//! driver:
//!   tick_millis: 16
//!   settle_threshold: 0.01   # optional
//!
//! palette:
//!   node: "#c6492c"
//!   node_hover: "#ffe213"
//! ```

use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{finite, ConfigError, GraphError, ParameterError};
use crate::graph::Graph;
use crate::interaction::palette::Palette;
use crate::interaction::timer::AUTO_CYCLE_INTERVAL;
use crate::simulation::driver::DriverOptions;
use crate::simulation::params::SimulationParams;

/// Simulation parameters plus the repulsion method
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub params: SimulationParams,
    pub barnes_hut: bool, // `true` - octree approximation, `false` - direct N^2 summation
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            params: SimulationParams::default(),
            barnes_hut: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    pub auto_cycle_secs: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            auto_cycle_secs: AUTO_CYCLE_INTERVAL.as_secs_f64(),
        }
    }
}

impl InteractionConfig {
    pub fn auto_cycle_interval(&self) -> Result<Duration, ParameterError> {
        let secs = finite("auto_cycle_secs", self.auto_cycle_secs)?;
        if secs <= 0.0 {
            return Err(ParameterError::new("auto_cycle_secs", secs, "must be positive"));
        }
        Duration::try_from_secs_f64(secs).map_err(|_| ParameterError::new("auto_cycle_secs", secs, "too large"))
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f64,
    pub framing_radius: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            framing_radius: 100.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    pub tick_millis: u64,
    pub settle_threshold: Option<f64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_millis: 16,
            settle_threshold: None,
        }
    }
}

impl DriverConfig {
    pub fn options(&self) -> DriverOptions {
        DriverOptions {
            tick: Duration::from_millis(self.tick_millis),
            settle_threshold: self.settle_threshold,
        }
    }
}

/// Top-level layout configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct LayoutConfig {
    pub simulation: EngineConfig,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
    pub driver: DriverConfig,
    pub palette: Palette,
}

impl LayoutConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reject out-of-range values up front, as the simulator setters would
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.simulation.params.validate()?;
        self.interaction.auto_cycle_interval()?;
        crate::camera::framing_distance(self.camera.framing_radius, self.camera.fov_degrees)?;
        Ok(())
    }
}

// =========================================================================================
// graph input
// =========================================================================================

/// Node id as found in graph files: a number or a string.
/// Serializes back to the same JSON shape, so `1` and `"1"` stay distinct.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum NodeKey {
    Number(i64),
    Text(String),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Number(n) => write!(f, "{n}"),
            NodeKey::Text(s) => f.write_str(s),
        }
    }
}

/// Numbers first: `"7"` parses as `Number(7)`
impl FromStr for NodeKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => NodeKey::Number(n),
            Err(_) => NodeKey::Text(s.to_string()),
        })
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        NodeKey::Text(value.to_string())
    }
}

impl From<i64> for NodeKey {
    fn from(value: i64) -> Self {
        NodeKey::Number(value)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct NodeRecord {
    pub id: NodeKey,
    #[serde(default)]
    pub data: serde_json::Value, // opaque payload (name, category, ...)
}

#[derive(Deserialize, Debug, Clone)]
pub struct LinkRecord {
    pub source: NodeKey,
    pub target: NodeKey,
    #[serde(default)]
    pub length: Option<f64>, // per-link rest length
}

#[derive(Deserialize, Debug, Clone)]
pub struct GraphFile {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

impl GraphFile {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Populate a graph store; the first bad record aborts the load
    pub fn into_graph(self) -> Result<Graph<NodeKey, serde_json::Value>, GraphError> {
        let mut graph = Graph::new();
        for node in self.nodes {
            graph.add_node(node.id, node.data)?;
        }
        for link in self.links {
            match link.length {
                Some(length) => graph.add_link_with_length(&link.source, &link.target, length)?,
                None => graph.add_link(&link.source, &link.target)?,
            };
        }
        Ok(graph)
    }
}
