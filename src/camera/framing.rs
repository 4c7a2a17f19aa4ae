//! Camera framing geometry
//!
//! Where should the camera go so that a sphere of `radius` around `target`
//! fills the vertical field of view, while keeping the camera's current
//! azimuth and elevation as seen from the target?
//!
//! The camera is placed at distance `radius / tan(fov / 2)` from the target,
//! along the target → camera direction expressed in spherical coordinates.

use crate::error::{finite, FramingError, ParameterError};
use crate::simulation::states::NVec3;

/// Distance below which camera and target count as the same point
const DEGENERATE_DISTANCE: f64 = 1e-12;

/// Destination camera position framing a sphere of `radius` around `target`.
///
/// # Parameters
/// - `camera`      : current camera position
/// - `target`      : point to frame
/// - `radius`      : framing radius (finite, >= 0)
/// - `fov_degrees` : vertical field of view, in (0, 180)
///
/// # Errors
/// - [`FramingError::DegenerateDirection`] when `camera` and `target` coincide
/// - [`FramingError::InvalidParameter`] for a bad radius or field of view
pub fn compute_framing_position(camera: NVec3, target: NVec3, radius: f64, fov_degrees: f64) -> Result<NVec3, FramingError> {
    let offset = framing_distance(radius, fov_degrees)?;

    let d = camera - target;
    let r = d.norm();
    if !r.is_finite() || r <= DEGENERATE_DISTANCE {
        return Err(FramingError::DegenerateDirection);
    }

    // clamp absorbs rounding just past the poles
    let polar = (d.z / r).clamp(-1.0, 1.0).acos();
    let azimuth = d.y.atan2(d.x);

    Ok(target
        + offset
            * NVec3::new(
                polar.sin() * azimuth.cos(),
                polar.sin() * azimuth.sin(),
                polar.cos(),
            ))
}

/// Like [`compute_framing_position`], looking down the Z axis (camera on +Z)
/// when camera and target coincide
pub fn framing_position_or_default(camera: NVec3, target: NVec3, radius: f64, fov_degrees: f64) -> Result<NVec3, FramingError> {
    match compute_framing_position(camera, target, radius, fov_degrees) {
        Err(FramingError::DegenerateDirection) => {
            let offset = framing_distance(radius, fov_degrees)?;
            Ok(target + NVec3::z() * offset)
        }
        other => other,
    }
}

/// `radius / tan(fov / 2)`
pub fn framing_distance(radius: f64, fov_degrees: f64) -> Result<f64, ParameterError> {
    let radius = finite("radius", radius)?;
    if radius < 0.0 {
        return Err(ParameterError::new("radius", radius, "must not be negative"));
    }
    let fov = finite("fov_degrees", fov_degrees)?;
    if fov <= 0.0 || fov >= 180.0 {
        return Err(ParameterError::new("fov_degrees", fov, "must lie in (0, 180)"));
    }

    Ok(radius / (fov.to_radians() * 0.5).tan())
}
