//! Total-energy diagnostic
//!
//! Validation signal only: nothing in the integrator reads these values.

use crate::physics::math::{Scalar, Vector, relative_difference};
use crate::physics::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

/// Σ ½·m·|v|²
pub fn kinetic_energy(velocities: &[Vector], masses: &[Scalar]) -> Scalar {
    velocities
        .iter()
        .zip(masses)
        .map(|(velocity, &mass)| 0.5 * mass * velocity.length_squared())
        .sum()
}

/// −Σ_{i<j} G·m_i·m_j / |r_i − r_j|, each unordered pair counted once.
pub fn potential_energy(
    positions: &[Vector],
    masses: &[Scalar],
    gravitational_constant: Scalar,
) -> Scalar {
    let mut potential = 0.0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let distance = (positions[i] - positions[j]).length();
            potential -= gravitational_constant * masses[i] * masses[j] / distance;
        }
    }
    potential
}

pub fn total_energy(
    positions: &[Vector],
    velocities: &[Vector],
    masses: &[Scalar],
    gravitational_constant: Scalar,
) -> Scalar {
    kinetic_energy(velocities, masses) + potential_energy(positions, masses, gravitational_constant)
}

/// Total energy at every sample of a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySeries {
    pub times: Vec<Scalar>,
    pub energies: Vec<Scalar>,
}

impl EnergySeries {
    pub fn from_trajectory(trajectory: &Trajectory, gravitational_constant: Scalar) -> Self {
        let masses = trajectory.masses();
        let (times, energies) = trajectory
            .samples()
            .iter()
            .map(|sample| {
                (
                    sample.time,
                    total_energy(
                        &sample.positions,
                        &sample.velocities,
                        masses,
                        gravitational_constant,
                    ),
                )
            })
            .unzip();

        Self { times, energies }
    }

    /// Relative change of the last sample against the first.
    pub fn relative_drift(&self) -> Scalar {
        match (self.energies.first(), self.energies.last()) {
            (Some(&initial), Some(&last)) => relative_difference(last, initial),
            _ => 0.0,
        }
    }

    /// Largest relative deviation from the initial energy over the series.
    pub fn max_relative_drift(&self) -> Scalar {
        let Some(&initial) = self.energies.first() else {
            return 0.0;
        };
        self.energies
            .iter()
            .map(|&energy| relative_difference(energy, initial))
            .fold(0.0, Scalar::max)
    }
}
