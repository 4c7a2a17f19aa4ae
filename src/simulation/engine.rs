//! The layout simulator
//!
//! Owns the bodies, springs, parameters and force set built from a [`Graph`].
//! A step runs force accumulation over every body and then integration; the
//! `&mut self` receiver on both `step` and the setters means a reconfiguration
//! can only land between two steps.

use tracing::debug;

use crate::error::ParameterError;
use crate::graph::{Graph, NodeIndex};
use crate::simulation::forces::{ForceContext, ForceSet};
use crate::simulation::integrator::symplectic_euler;
use crate::simulation::params::{ParamChange, SimulationParams};
use crate::simulation::placement::seed_positions;
use crate::simulation::states::{Body, NVec3, Snapshot, Spring, StepMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Uninitialized, // built, never stepped
    Running,
}

pub struct Simulator {
    bodies: Vec<Body>,
    springs: Vec<Spring>,
    params: SimulationParams,
    forces: ForceSet,
    scratch: Vec<NVec3>, // per-body force buffer, reused across steps
    barnes_hut: bool,
    state: SimulatorState,
    steps: u64,
    last: StepMetrics,
}

impl Simulator {
    /// Build a simulator over `graph` using Barnes–Hut repulsion.
    /// Bodies start at rest, at the nodes' explicit positions or seeded one
    /// spring length apart (see [`seed_positions`]).
    pub fn new<I, D>(graph: &Graph<I, D>, params: SimulationParams) -> Result<Self, ParameterError> {
        Self::with_repulsion(graph, params, true)
    }

    /// Same as [`Simulator::new`], choosing between octree and exact repulsion
    pub fn with_repulsion<I, D>(graph: &Graph<I, D>, params: SimulationParams, barnes_hut: bool) -> Result<Self, ParameterError> {
        params.validate()?;

        let bodies: Vec<Body> = graph
            .nodes()
            .zip(seed_positions(graph, params.spring_length))
            .map(|(n, x)| Body::at_rest(x, n.mass))
            .collect();
        let springs: Vec<Spring> = graph
            .links()
            .map(|l| Spring {
                from: l.from.0,
                to: l.to.0,
                length: l.length,
            })
            .collect();

        debug!(bodies = bodies.len(), springs = springs.len(), barnes_hut, "simulator built");

        Ok(Self {
            scratch: vec![NVec3::zeros(); bodies.len()],
            bodies,
            springs,
            params,
            forces: ForceSet::layout(barnes_hut),
            barnes_hut,
            state: SimulatorState::Uninitialized,
            steps: 0,
            last: StepMetrics::default(),
        })
    }

    /// Replace the force set, e.g. to add a custom term
    pub fn with_forces(mut self, forces: ForceSet) -> Self {
        self.forces = forces;
        self
    }

    /// Advance the layout by one fixed time step
    pub fn step(&mut self) -> StepMetrics {
        let ctx = ForceContext {
            params: &self.params,
            springs: &self.springs,
            step: self.steps,
        };
        self.forces.accumulate_forces(&ctx, &self.bodies, &mut self.scratch);

        self.steps += 1;
        self.last = symplectic_euler(&mut self.bodies, &self.scratch, self.params.time_step, self.steps);
        self.state = SimulatorState::Running;

        debug!(
            step = self.last.step,
            kinetic_energy = self.last.kinetic_energy,
            max_displacement = self.last.max_displacement,
            "layout step"
        );
        self.last
    }

    /// Run `n` steps, returning the metrics of the last one
    pub fn run(&mut self, n: u64) -> StepMetrics {
        for _ in 0..n {
            self.step();
        }
        self.last
    }

    // reconfiguration ===================================================================

    pub fn apply(&mut self, change: ParamChange) -> Result<(), ParameterError> {
        self.params.apply(change)?;
        debug!(?change, "reconfigured");
        Ok(())
    }

    pub fn set_spring_length(&mut self, value: f64) -> Result<(), ParameterError> {
        self.apply(ParamChange::SpringLength(value))
    }

    pub fn set_spring_coeff(&mut self, value: f64) -> Result<(), ParameterError> {
        self.apply(ParamChange::SpringCoeff(value))
    }

    pub fn set_gravity(&mut self, value: f64) -> Result<(), ParameterError> {
        self.apply(ParamChange::Gravity(value))
    }

    pub fn set_theta(&mut self, value: f64) -> Result<(), ParameterError> {
        self.apply(ParamChange::Theta(value))
    }

    pub fn set_drag_coeff(&mut self, value: f64) -> Result<(), ParameterError> {
        self.apply(ParamChange::DragCoeff(value))
    }

    pub fn set_time_step(&mut self, value: f64) -> Result<(), ParameterError> {
        self.apply(ParamChange::TimeStep(value))
    }

    /// Switch between octree and exact repulsion; keeps drag and springs
    pub fn use_barnes_hut(&mut self, enabled: bool) {
        if enabled != self.barnes_hut {
            self.forces = ForceSet::layout(enabled);
            self.barnes_hut = enabled;
        }
    }

    // observation =======================================================================

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn last_metrics(&self) -> StepMetrics {
        self.last
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: NodeIndex) -> Option<&Body> {
        self.bodies.get(index.0)
    }

    pub fn position(&self, index: NodeIndex) -> Option<NVec3> {
        self.bodies.get(index.0).map(|b| b.x)
    }

    /// Owned copy of every position, safe to hand to another thread
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.steps,
            positions: self.bodies.iter().map(|b| b.x).collect(),
            metrics: self.last,
        }
    }
}
