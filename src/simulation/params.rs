//! Tunable layout parameters
//!
//! `SimulationParams` holds the per-run settings:
//! - spring rest length and stiffness,
//! - gravity (negative = mutual repulsion),
//! - Barnes–Hut opening threshold `theta`,
//! - velocity drag and the fixed integration step.
//!
//! Defaults give the stock layout look.
//! Every change goes through [`ParamChange::validate`], so a rejected value never
//! reaches the running configuration.

use serde::Deserialize;

use crate::error::{finite, ParameterError};

pub const SPRING_LENGTH: f64 = 110.0;
pub const SPRING_COEFF: f64 = 0.000_001;
pub const GRAVITY: f64 = -2.0;
pub const THETA: f64 = 0.1;
pub const DRAG_COEFF: f64 = 0.3;
pub const TIME_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub spring_length: f64, // rest length of a link
    pub spring_coeff: f64, // Hooke stiffness
    pub gravity: f64, // pairwise constant, negative pushes apart
    pub theta: f64, // cell width / distance cut-off, (0, 1]
    pub drag_coeff: f64, // force -= v * drag
    pub time_step: f64, // fixed dt
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            spring_length: SPRING_LENGTH,
            spring_coeff: SPRING_COEFF,
            gravity: GRAVITY,
            theta: THETA,
            drag_coeff: DRAG_COEFF,
            time_step: TIME_STEP,
        }
    }
}

impl SimulationParams {
    /// Check every field, e.g. after deserializing a config file
    pub fn validate(&self) -> Result<(), ParameterError> {
        ParamChange::SpringLength(self.spring_length).validate()?;
        ParamChange::SpringCoeff(self.spring_coeff).validate()?;
        ParamChange::Gravity(self.gravity).validate()?;
        ParamChange::Theta(self.theta).validate()?;
        ParamChange::DragCoeff(self.drag_coeff).validate()?;
        ParamChange::TimeStep(self.time_step).validate()?;
        Ok(())
    }

    /// Apply a change; on error `self` is left untouched
    pub fn apply(&mut self, change: ParamChange) -> Result<(), ParameterError> {
        change.validate()?;
        match change {
            ParamChange::SpringLength(v) => self.spring_length = v,
            ParamChange::SpringCoeff(v) => self.spring_coeff = v,
            ParamChange::Gravity(v) => self.gravity = v,
            ParamChange::Theta(v) => self.theta = v,
            ParamChange::DragCoeff(v) => self.drag_coeff = v,
            ParamChange::TimeStep(v) => self.time_step = v,
        }
        Ok(())
    }
}

/// One reconfiguration request, applied between steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    SpringLength(f64),
    SpringCoeff(f64),
    Gravity(f64),
    Theta(f64),
    DragCoeff(f64),
    TimeStep(f64),
}

impl ParamChange {
    pub fn validate(&self) -> Result<(), ParameterError> {
        match *self {
            ParamChange::SpringLength(v) => {
                if finite("spring_length", v)? <= 0.0 {
                    return Err(ParameterError::new("spring_length", v, "must be positive"));
                }
            }
            ParamChange::SpringCoeff(v) => {
                finite("spring_coeff", v)?;
            }
            ParamChange::Gravity(v) => {
                finite("gravity", v)?;
            }
            ParamChange::Theta(v) => {
                let v = finite("theta", v)?;
                if v <= 0.0 || v > 1.0 {
                    return Err(ParameterError::new("theta", v, "must lie in (0, 1]"));
                }
            }
            ParamChange::DragCoeff(v) => {
                if finite("drag_coeff", v)? < 0.0 {
                    return Err(ParameterError::new("drag_coeff", v, "must not be negative"));
                }
            }
            ParamChange::TimeStep(v) => {
                if finite("time_step", v)? <= 0.0 {
                    return Err(ParameterError::new("time_step", v, "must be positive"));
                }
            }
        }
        Ok(())
    }
}
