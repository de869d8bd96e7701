//! Time-indexed history of a simulation run

use crate::error::{OrbitChaosError, Result};
use crate::physics::components::SystemState;
use crate::physics::math::{Scalar, Vector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Positions and velocities of every body at one sample time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulation time in seconds since the start of the run
    pub time: Scalar,
    pub positions: Vec<Vector>,
    pub velocities: Vec<Vector>,
}

impl Snapshot {
    pub fn capture(time: Scalar, state: &SystemState) -> Self {
        Self {
            time,
            positions: state.positions().to_vec(),
            velocities: state.velocities().to_vec(),
        }
    }
}

/// Ordered samples of one run plus the (fixed) masses they were produced with.
///
/// Sample 0 is the initial condition. Samples are recorded at a constant step
/// stride, so times increase monotonically and are evenly spaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    masses: Vec<Scalar>,
    samples: Vec<Snapshot>,
}

impl Trajectory {
    pub fn new(masses: Vec<Scalar>) -> Self {
        Self {
            masses,
            samples: Vec::new(),
        }
    }

    /// Build a trajectory from already recorded samples, checking its invariants.
    pub fn from_samples(masses: Vec<Scalar>, samples: Vec<Snapshot>) -> Result<Self> {
        let trajectory = Self { masses, samples };
        trajectory.validate()?;
        Ok(trajectory)
    }

    pub(crate) fn record(&mut self, snapshot: Snapshot) {
        debug_assert_eq!(snapshot.positions.len(), self.masses.len());
        self.samples.push(snapshot);
    }

    #[inline]
    pub fn masses(&self) -> &[Scalar] {
        &self.masses
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.masses.len()
    }

    #[inline]
    pub fn samples(&self) -> &[Snapshot] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn initial(&self) -> Option<&Snapshot> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.samples.last()
    }

    pub fn times(&self) -> Vec<Scalar> {
        self.samples.iter().map(|sample| sample.time).collect()
    }

    /// Position of `body` at every sample.
    pub fn positions_of(&self, body: usize) -> Result<Vec<Vector>> {
        self.check_body(body)?;
        Ok(self
            .samples
            .iter()
            .map(|sample| sample.positions[body])
            .collect())
    }

    /// Velocity of `body` at every sample.
    pub fn velocities_of(&self, body: usize) -> Result<Vec<Vector>> {
        self.check_body(body)?;
        Ok(self
            .samples
            .iter()
            .map(|sample| sample.velocities[body])
            .collect())
    }

    pub fn check_body(&self, body: usize) -> Result<()> {
        if body < self.body_count() {
            Ok(())
        } else {
            Err(OrbitChaosError::configuration(format!(
                "body index {body} is out of range for a trajectory of {} bodies",
                self.body_count()
            )))
        }
    }

    /// Check sample shapes and that times strictly increase.
    pub fn validate(&self) -> Result<()> {
        let bodies = self.body_count();
        let mut previous_time = None;

        for (index, sample) in self.samples.iter().enumerate() {
            if sample.positions.len() != bodies || sample.velocities.len() != bodies {
                return Err(OrbitChaosError::invalid_input(format!(
                    "sample {index} has {} positions and {} velocities for {bodies} bodies",
                    sample.positions.len(),
                    sample.velocities.len()
                )));
            }
            if let Some(previous) = previous_time {
                if sample.time <= previous {
                    return Err(OrbitChaosError::invalid_input(format!(
                        "sample {index} at t = {} does not follow t = {previous}",
                        sample.time
                    )));
                }
            }
            previous_time = Some(sample.time);
        }

        Ok(())
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let trajectory: Self = serde_json::from_str(&content)?;
        trajectory.validate()?;
        Ok(trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: Scalar, x: Scalar) -> Snapshot {
        Snapshot {
            time,
            positions: vec![Vector::ZERO, Vector::new(x, 0.0, 0.0)],
            velocities: vec![Vector::ZERO, Vector::new(0.0, x, 0.0)],
        }
    }

    #[test]
    fn test_per_body_series() {
        let trajectory =
            Trajectory::from_samples(vec![1.0, 2.0], vec![sample(0.0, 1.0), sample(10.0, 2.0)])
                .unwrap();

        assert_eq!(trajectory.times(), vec![0.0, 10.0]);
        assert_eq!(
            trajectory.positions_of(1).unwrap(),
            vec![Vector::new(1.0, 0.0, 0.0), Vector::new(2.0, 0.0, 0.0)]
        );
        assert_eq!(trajectory.velocities_of(1).unwrap()[1].y, 2.0);
        assert!(trajectory.positions_of(2).is_err());
    }

    #[test]
    fn test_rejects_non_monotonic_times() {
        let result =
            Trajectory::from_samples(vec![1.0, 2.0], vec![sample(10.0, 1.0), sample(10.0, 2.0)]);
        assert!(matches!(result, Err(OrbitChaosError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_wrong_body_count() {
        let mut bad = sample(0.0, 1.0);
        bad.velocities.pop();
        assert!(Trajectory::from_samples(vec![1.0, 2.0], vec![bad]).is_err());
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("trajectory.json");
        let trajectory = Trajectory::from_samples(
            vec![1.989e30, 5.972e24],
            vec![sample(0.0, 1.496e11), sample(43_200.0, 1.496_000_000_123e11)],
        )
        .unwrap();

        trajectory.save_json(&path).unwrap();
        let loaded = Trajectory::load_json(&path).unwrap();

        assert_eq!(loaded, trajectory);
    }
}
