//! Force models: per-body accelerations from positions and masses

use crate::physics::constants::PhysicalConstants;
use crate::physics::math::{Scalar, Vector};

/// Pairs closer than this (m) are skipped by [`NewtonianGravity`].
pub const DEFAULT_MIN_SEPARATION: Scalar = 1e-10;

/// Pure mapping from a configuration of bodies to their accelerations.
///
/// Implementations must overwrite every entry of `out` and must not keep state
/// between calls. Any `Fn(&[Vector], &[Scalar], &mut [Vector])` closure is a
/// force model, which keeps the law injectable for tests and alternative
/// physics.
pub trait ForceModel: Send + Sync {
    /// Write the acceleration of body `i` into `out[i]`.
    ///
    /// `positions`, `masses` and `out` all have the same length.
    fn accelerations_into(&self, positions: &[Vector], masses: &[Scalar], out: &mut [Vector]);

    /// Allocating convenience over [`ForceModel::accelerations_into`].
    fn accelerations(&self, positions: &[Vector], masses: &[Scalar]) -> Vec<Vector> {
        let mut out = vec![Vector::ZERO; positions.len()];
        self.accelerations_into(positions, masses, &mut out);
        out
    }
}

impl<F> ForceModel for F
where
    F: Fn(&[Vector], &[Scalar], &mut [Vector]) + Send + Sync,
{
    fn accelerations_into(&self, positions: &[Vector], masses: &[Scalar], out: &mut [Vector]) {
        self(positions, masses, out)
    }
}

/// Direct-summation Newtonian gravity.
///
/// For every ordered pair (i, j), i ≠ j:
///
/// ```text
/// a_i += G * m_j * (x_j - x_i) / |x_j - x_i|³
/// ```
///
/// A pair whose separation is below `min_separation` contributes nothing, so
/// coincident bodies never produce non-finite accelerations.
///
/// Cost is O(N²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub gravitational_constant: Scalar,
    pub min_separation: Scalar,
}

impl NewtonianGravity {
    pub fn new(gravitational_constant: Scalar) -> Self {
        Self {
            gravitational_constant,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }

    pub fn from_constants(constants: &PhysicalConstants) -> Self {
        Self::new(constants.gravitational_constant)
    }

    pub fn with_min_separation(mut self, min_separation: Scalar) -> Self {
        self.min_separation = min_separation;
        self
    }
}

impl ForceModel for NewtonianGravity {
    fn accelerations_into(&self, positions: &[Vector], masses: &[Scalar], out: &mut [Vector]) {
        debug_assert_eq!(positions.len(), masses.len());
        debug_assert_eq!(positions.len(), out.len());

        for (i, (&position_i, acceleration)) in positions.iter().zip(out.iter_mut()).enumerate() {
            let mut total = Vector::ZERO;

            for (j, (&position_j, &mass_j)) in positions.iter().zip(masses).enumerate() {
                if i == j {
                    continue;
                }

                let displacement = position_j - position_i;
                let distance = displacement.length();
                if distance < self.min_separation {
                    continue;
                }

                total += displacement
                    * (self.gravitational_constant * mass_j / (distance * distance * distance));
            }

            *acceleration = total;
        }
    }
}
