//! Fixed-step time integration for the layout
//!
//! Symplectic (semi-implicit) Euler: the velocity is updated from the force
//! first and the position then moves with the *new* velocity. This keeps the
//! spring oscillations bounded where explicit Euler would slowly gain energy.

use super::states::{Body, NVec3, StepMetrics};

/// Advance every body by one step of `dt` given the accumulated `forces`.
///
/// - Kick:  v_n+1 = v_n + (F_n / m) * dt
/// - Drift: x_n+1 = x_n + v_n+1 * dt
///
/// Returns the step's kinetic energy and largest displacement; `step` is
/// copied into the metrics as-is.
pub fn symplectic_euler(bodies: &mut [Body], forces: &[NVec3], dt: f64, step: u64) -> StepMetrics {
    let mut kinetic_energy = 0.0;
    let mut max_speed2: f64 = 0.0;

    for (b, f) in bodies.iter_mut().zip(forces.iter()) {
        // Kick
        b.v += (*f / b.m) * dt;
        // Drift
        b.x += b.v * dt;

        let speed2 = b.v.norm_squared();
        kinetic_energy += 0.5 * b.m * speed2;
        max_speed2 = max_speed2.max(speed2);
    }

    StepMetrics {
        step,
        kinetic_energy,
        max_displacement: max_speed2.sqrt() * dt,
    }
}
