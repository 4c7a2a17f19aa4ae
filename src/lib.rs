pub mod error;
pub mod graph;
pub mod simulation;
pub mod interaction;
pub mod camera;
pub mod configuration;
pub mod benchmark;

pub use error::{ConfigError, FramingError, GraphError, ParameterError};

pub use graph::{GeneratorKind, Graph, Link, LinkIndex, Node, NodeIndex};

pub use simulation::states::{Body, NVec3, Snapshot, StepMetrics};
pub use simulation::params::{ParamChange, SimulationParams};
pub use simulation::forces::{ForceSet, ForceTerm, ForceContext, SpringForce, BarnesHutRepulsion, DirectRepulsion, Drag, exact_repulsion};
pub use simulation::barnes_hut::Octree;
pub use simulation::placement::{seed_positions, spiral_position};
pub use simulation::engine::{Simulator, SimulatorState};
pub use simulation::driver::{DriverOptions, LayoutDriver, LayoutHandle};

pub use interaction::{AutoCycleTimer, Emphasis, HighlightEvent, HighlightMachine, HighlightRequest, HighlightSink, HighlightState, Origin, Palette, Paint, Rgb};

pub use camera::{compute_framing_position, framing_position_or_default};

pub use configuration::config::{LayoutConfig, EngineConfig, GraphFile, NodeKey};

pub use benchmark::benchmark::{bench_graph, bench_repulsion, bench_step_curve};
