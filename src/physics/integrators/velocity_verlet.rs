//! Velocity Verlet integration method

use super::Integrator;
use crate::physics::components::SystemState;
use crate::physics::forces::ForceModel;
use crate::physics::math::{Scalar, Vector};

/// Velocity Verlet integrator
///
/// A second-order, time-reversible integrator with bounded long-term energy
/// error for Hamiltonian systems like gravitational n-body problems. Each step
/// costs exactly one force evaluation because the acceleration computed at the
/// end of one step is reused at the start of the next. Both acceleration
/// buffers belong to the caller, so a step allocates nothing.
///
/// The algorithm:
/// 1. Predict position: x(t+dt) = x(t) + v(t)*dt + 0.5*a(t)*dt²
/// 2. Recompute acceleration at the new positions: a(t+dt) = F(x(t+dt))
/// 3. Correct velocity: v(t+dt) = v(t) + 0.5*(a(t) + a(t+dt))*dt
///
/// Running the same number of steps with `-dt` retraces the trajectory up to
/// floating-point rounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn step(
        &self,
        state: &mut SystemState,
        accelerations: &mut [Vector],
        scratch: &mut [Vector],
        force: &dyn ForceModel,
        dt: Scalar,
    ) {
        let (positions, velocities, masses) = state.kinematics_mut();
        debug_assert_eq!(positions.len(), accelerations.len());
        debug_assert_eq!(positions.len(), scratch.len());

        for ((position, velocity), acceleration) in positions
            .iter_mut()
            .zip(velocities.iter())
            .zip(accelerations.iter())
        {
            *position += *velocity * dt + *acceleration * (0.5 * dt * dt);
        }

        force.accelerations_into(positions, masses, scratch);

        for ((velocity, previous), next) in velocities
            .iter_mut()
            .zip(accelerations.iter())
            .zip(scratch.iter())
        {
            *velocity += (*previous + *next) * (0.5 * dt);
        }

        accelerations.swap_with_slice(scratch);
    }

    fn name(&self) -> &'static str {
        "velocity_verlet"
    }

    fn convergence_order(&self) -> usize {
        2
    }
}
