//! Numerical integration methods for n-body simulation

use crate::physics::components::SystemState;
use crate::physics::forces::ForceModel;
use crate::physics::math::{Scalar, Vector};

pub mod velocity_verlet;

pub use velocity_verlet::VelocityVerlet;

/// Fixed-step integrator over a whole system.
///
/// Integrators are stateless: everything that survives between steps lives in
/// the caller's [`SystemState`] and acceleration buffer.
pub trait Integrator: Send + Sync {
    /// Advance `state` by one step of `dt`.
    ///
    /// On entry `accelerations` holds a(t) for the current positions; on exit it
    /// holds a(t + dt) for the new positions, ready for the next step. `scratch`
    /// has the same length and its contents are overwritten.
    fn step(
        &self,
        state: &mut SystemState,
        accelerations: &mut [Vector],
        scratch: &mut [Vector],
        force: &dyn ForceModel,
        dt: Scalar,
    );

    fn name(&self) -> &'static str;

    fn convergence_order(&self) -> usize;
}
