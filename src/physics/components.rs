//! Body and system state for n-body simulation

use crate::error::{OrbitChaosError, Result};
use crate::physics::math::{Scalar, Vector, is_finite_vector};
use serde::{Deserialize, Serialize};

/// A single massive body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub mass: Scalar,
    pub position: Vector,
    pub velocity: Vector,
}

impl Body {
    pub fn new(mass: Scalar, position: Vector, velocity: Vector) -> Self {
        Self {
            mass,
            position,
            velocity,
        }
    }
}

/// Ordered, fixed-size collection of bodies.
///
/// Stored as parallel arrays so force models and integrators can work on
/// contiguous slices. Index order is significant: every trajectory array and
/// orbital-element call addresses bodies by position, with index 0 being the
/// primary. Masses are fixed once the state is built; only positions and
/// velocities change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    masses: Vec<Scalar>,
    positions: Vec<Vector>,
    velocities: Vec<Vector>,
}

impl SystemState {
    /// Build a state from bodies, rejecting empty systems, non-positive masses and
    /// non-finite vectors.
    pub fn new(bodies: impl IntoIterator<Item = Body>) -> Result<Self> {
        let mut masses = Vec::new();
        let mut positions = Vec::new();
        let mut velocities = Vec::new();

        for (index, body) in bodies.into_iter().enumerate() {
            if !(body.mass.is_finite() && body.mass > 0.0) {
                return Err(OrbitChaosError::configuration(format!(
                    "body {index} has non-positive mass {}",
                    body.mass
                )));
            }
            if !is_finite_vector(body.position) || !is_finite_vector(body.velocity) {
                return Err(OrbitChaosError::configuration(format!(
                    "body {index} has a non-finite position or velocity"
                )));
            }
            masses.push(body.mass);
            positions.push(body.position);
            velocities.push(body.velocity);
        }

        if masses.is_empty() {
            return Err(OrbitChaosError::configuration(
                "a system needs at least one body",
            ));
        }

        Ok(Self {
            masses,
            positions,
            velocities,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    #[inline]
    pub fn masses(&self) -> &[Scalar] {
        &self.masses
    }

    #[inline]
    pub fn positions(&self) -> &[Vector] {
        &self.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[Vector] {
        &self.velocities
    }

    /// Mutable kinematics alongside the (immutable) masses.
    #[inline]
    pub fn kinematics_mut(&mut self) -> (&mut [Vector], &mut [Vector], &[Scalar]) {
        (&mut self.positions, &mut self.velocities, &self.masses)
    }

    pub fn body(&self, index: usize) -> Option<Body> {
        Some(Body::new(
            *self.masses.get(index)?,
            self.positions[index],
            self.velocities[index],
        ))
    }

    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.masses
            .iter()
            .zip(&self.positions)
            .zip(&self.velocities)
            .map(|((&mass, &position), &velocity)| Body::new(mass, position, velocity))
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(OrbitChaosError::configuration(format!(
                "body index {index} is out of range for a system of {} bodies",
                self.len()
            )))
        }
    }
}
