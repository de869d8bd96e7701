//! Separation between two runs of the same system

use crate::error::{OrbitChaosError, Result};
use crate::physics::math::Scalar;
use crate::physics::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

/// Sample times of paired runs may differ by this relative amount.
const TIME_MATCH_TOLERANCE: Scalar = 1e-12;

/// Distance between one body's positions in two trajectories, per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparationSeries {
    pub body: usize,
    pub times: Vec<Scalar>,
    pub separations: Vec<Scalar>,
}

impl SeparationSeries {
    /// Fails with `InvalidInput` unless both trajectories have the same body
    /// count and the same sample timestamps.
    pub fn between(baseline: &Trajectory, perturbed: &Trajectory, body: usize) -> Result<Self> {
        check_paired(baseline, perturbed)?;
        baseline.check_body(body)?;

        let separations = baseline
            .samples()
            .iter()
            .zip(perturbed.samples())
            .map(|(a, b)| (a.positions[body] - b.positions[body]).length())
            .collect();

        Ok(Self {
            body,
            times: baseline.times(),
            separations,
        })
    }

    pub fn len(&self) -> usize {
        self.separations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.separations.is_empty()
    }

    pub fn initial(&self) -> Option<Scalar> {
        self.separations.first().copied()
    }

    /// Separations divided by the separation at sample `reference`.
    pub fn normalized_from(&self, reference: usize) -> Result<Vec<Scalar>> {
        let Some(&origin) = self.separations.get(reference) else {
            return Err(OrbitChaosError::invalid_input(format!(
                "reference sample {reference} is beyond the {} recorded samples",
                self.len()
            )));
        };
        Ok(self
            .separations
            .iter()
            .map(|separation| separation / origin)
            .collect())
    }

    /// First sample whose separation reaches `floor`.
    ///
    /// Runs that differ only in velocity start at the same position, so their
    /// separation only becomes measurable after the first recorded step.
    pub fn first_separated_sample(&self, floor: Scalar) -> Option<usize> {
        self.separations
            .iter()
            .position(|&separation| separation >= floor)
    }

    pub fn max_separation(&self) -> Scalar {
        self.separations.iter().copied().fold(0.0, Scalar::max)
    }
}

/// Check that two trajectories can be compared sample by sample.
pub fn check_paired(baseline: &Trajectory, perturbed: &Trajectory) -> Result<()> {
    if baseline.body_count() != perturbed.body_count() {
        return Err(OrbitChaosError::invalid_input(format!(
            "trajectories have {} and {} bodies",
            baseline.body_count(),
            perturbed.body_count()
        )));
    }
    if baseline.len() != perturbed.len() {
        return Err(OrbitChaosError::invalid_input(format!(
            "trajectories have {} and {} samples",
            baseline.len(),
            perturbed.len()
        )));
    }

    for (index, (a, b)) in baseline
        .samples()
        .iter()
        .zip(perturbed.samples())
        .enumerate()
    {
        let scale = a.time.abs().max(b.time.abs());
        if (a.time - b.time).abs() > TIME_MATCH_TOLERANCE * scale {
            return Err(OrbitChaosError::invalid_input(format!(
                "sample {index} is at t = {} in one trajectory and t = {} in the other",
                a.time, b.time
            )));
        }
    }

    Ok(())
}
