//! Core state types for the layout simulation.
//!
//! - `Body`        – live position / velocity / mass of one graph node
//! - `Spring`      – a link resolved to body indices
//! - `StepMetrics` – per-step observation point (kinetic energy, max displacement)
//! - `Snapshot`    – owned copy of positions taken between steps

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
}

impl Body {
    pub fn at_rest(x: NVec3, m: f64) -> Self {
        Self { x, v: NVec3::zeros(), m }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub from: usize, // body index
    pub to: usize, // body index
    pub length: Option<f64>, // rest length override
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepMetrics {
    pub step: u64, // steps completed when measured
    pub kinetic_energy: f64, // sum of 1/2 m |v|^2
    pub max_displacement: f64, // largest |v| * dt this step
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub step: u64,
    pub positions: Vec<NVec3>,
    pub metrics: StepMetrics,
}

impl Snapshot {
    pub fn position(&self, index: usize) -> Option<NVec3> {
        self.positions.get(index).copied()
    }
}
