//! Error types shared across the crate
//!
//! - [`GraphError`]     – graph store failures, fatal to the caller (fix the input)
//! - [`ParameterError`] – out-of-range reconfiguration, prior value kept
//! - [`FramingError`]   – camera framing, recoverable by substituting a direction
//! - [`ConfigError`]    – loading YAML config / JSON graph files

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node id {0} already exists")]
    DuplicateId(String),

    #[error("link references unknown node {0}")]
    UnknownNode(String),

    #[error("node {0} not found")]
    NotFound(String),

    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
}

/// A parameter value outside its allowed range
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {name} = {value}: {reason}")]
pub struct ParameterError {
    pub name: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

impl ParameterError {
    pub(crate) fn new(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self { name, value, reason }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FramingError {
    /// Camera and target coincide, so there is no direction to keep
    #[error("camera and target coincide; framing direction is undefined")]
    DegenerateDirection,

    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
}

/// Reject NaN and infinities before any range check
pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, ParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::new(name, value, "must be finite"))
    }
}
