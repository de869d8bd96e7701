//! Finite-time Lyapunov exponent from a baseline and a perturbed run

use crate::analysis::divergence::SeparationSeries;
use crate::error::{OrbitChaosError, Result};
use crate::physics::math::Scalar;
use crate::physics::trajectory::Trajectory;
use bevy::log::debug;
use serde::{Deserialize, Serialize};

/// Initial separations below this are too small to normalize by.
pub const DEFAULT_SEPARATION_FLOOR: Scalar = 1e-10;

pub const DEFAULT_FIT_POINTS: usize = 10;

/// Which samples of the log-separation series enter the growth-rate fit.
///
/// Divergence is exponential only until the runs decorrelate, so the choice of
/// window changes the exponent materially on the same data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FitWindow {
    /// `min(count, n)` indices spread evenly over the whole series, always
    /// including the first and last sample.
    EvenlySpaced { count: usize },
    /// The first `n / 2` samples.
    FirstHalf,
}

impl Default for FitWindow {
    fn default() -> Self {
        Self::EvenlySpaced {
            count: DEFAULT_FIT_POINTS,
        }
    }
}

impl FitWindow {
    /// Sample indices selected from a series of `len` samples, ascending.
    pub fn indices(&self, len: usize) -> Vec<usize> {
        match *self {
            Self::EvenlySpaced { count } => {
                let points = count.min(len);
                if points < 2 {
                    return (0..points).collect();
                }
                (0..points)
                    .map(|k| k * (len - 1) / (points - 1))
                    .collect()
            }
            Self::FirstHalf => (0..len / 2).collect(),
        }
    }
}

/// Outcome of a growth-rate fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyapunovResult {
    /// λ in inverse seconds
    pub exponent: Scalar,
    pub body: usize,
    /// Sample the separation was normalized against; times are measured from it
    pub reference_sample: usize,
    pub window: FitWindow,
    /// Time since the reference sample, for every sample from it onward
    pub times: Vec<Scalar>,
    /// ln(d(t) / d₀) aligned with `times`
    pub log_distances: Vec<Scalar>,
    /// Indices into `times` that entered the fit
    pub fit_indices: Vec<usize>,
}

impl LyapunovResult {
    pub fn exponent_per_day(&self, seconds_per_day: Scalar) -> Scalar {
        self.exponent * seconds_per_day
    }

    /// e-folding time of the separation in seconds, infinite when λ ≤ 0.
    pub fn lyapunov_time(&self) -> Scalar {
        if self.exponent > 0.0 {
            1.0 / self.exponent
        } else {
            Scalar::INFINITY
        }
    }
}

/// Fits `ln(d(t)/d₀) = λ·t` to the separation of one body in two runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LyapunovEstimator {
    pub window: FitWindow,
    pub separation_floor: Scalar,
}

impl Default for LyapunovEstimator {
    fn default() -> Self {
        Self {
            window: FitWindow::default(),
            separation_floor: DEFAULT_SEPARATION_FLOOR,
        }
    }
}

impl LyapunovEstimator {
    pub fn new(window: FitWindow) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    pub fn with_separation_floor(mut self, separation_floor: Scalar) -> Self {
        self.separation_floor = separation_floor;
        self
    }

    /// Fit against the separation at sample 0.
    pub fn estimate(
        &self,
        baseline: &Trajectory,
        perturbed: &Trajectory,
        body: usize,
    ) -> Result<LyapunovResult> {
        let series = SeparationSeries::between(baseline, perturbed, body)?;
        self.estimate_series(&series, 0)
    }

    /// Fit against the separation at sample `reference`, with times measured
    /// from that sample.
    pub fn estimate_from(
        &self,
        baseline: &Trajectory,
        perturbed: &Trajectory,
        body: usize,
        reference: usize,
    ) -> Result<LyapunovResult> {
        let series = SeparationSeries::between(baseline, perturbed, body)?;
        self.estimate_series(&series, reference)
    }

    pub fn estimate_series(
        &self,
        series: &SeparationSeries,
        reference: usize,
    ) -> Result<LyapunovResult> {
        let Some(&initial) = series.separations.get(reference) else {
            return Err(OrbitChaosError::invalid_input(format!(
                "reference sample {reference} is beyond the {} recorded samples",
                series.len()
            )));
        };
        if !(initial >= self.separation_floor) {
            return Err(OrbitChaosError::invalid_input(format!(
                "initial separation {initial:e} m is below the floor of {:e} m",
                self.separation_floor
            )));
        }

        let origin = series.times[reference];
        let times: Vec<Scalar> = series.times[reference..]
            .iter()
            .map(|time| time - origin)
            .collect();
        let log_distances: Vec<Scalar> = series.separations[reference..]
            .iter()
            .map(|separation| (separation / initial).ln())
            .collect();

        let fit_indices = self.window.indices(times.len());
        let fit_times: Vec<Scalar> = fit_indices.iter().map(|&index| times[index]).collect();
        let fit_values: Vec<Scalar> = fit_indices
            .iter()
            .map(|&index| log_distances[index])
            .collect();

        let exponent = fit_through_origin(&fit_times, &fit_values)?;
        debug!(
            "Fitted λ = {exponent:e} 1/s over {} of {} samples (body {}, reference sample {reference})",
            fit_indices.len(),
            times.len(),
            series.body
        );

        Ok(LyapunovResult {
            exponent,
            body: series.body,
            reference_sample: reference,
            window: self.window,
            times,
            log_distances,
            fit_indices,
        })
    }
}

/// Estimate λ for `body` with the default separation floor.
pub fn lyapunov(
    baseline: &Trajectory,
    perturbed: &Trajectory,
    body: usize,
    window: FitWindow,
) -> Result<LyapunovResult> {
    LyapunovEstimator::new(window).estimate(baseline, perturbed, body)
}

/// Least-squares slope of `y = λ·t` with no intercept: λ = Σty / Σt².
pub fn fit_through_origin(times: &[Scalar], values: &[Scalar]) -> Result<Scalar> {
    if times.len() != values.len() {
        return Err(OrbitChaosError::fit(format!(
            "{} times paired with {} values",
            times.len(),
            values.len()
        )));
    }
    if times.len() < 2 {
        return Err(OrbitChaosError::fit(format!(
            "need at least two points, got {}",
            times.len()
        )));
    }
    if let Some((time, value)) = times
        .iter()
        .zip(values)
        .find(|(time, value)| !time.is_finite() || !value.is_finite())
    {
        return Err(OrbitChaosError::fit(format!(
            "non-finite point ({time}, {value}) in the fit window"
        )));
    }

    let sum_tt: Scalar = times.iter().map(|time| time * time).sum();
    if sum_tt == 0.0 {
        return Err(OrbitChaosError::fit("all fit times are zero"));
    }
    let sum_ty: Scalar = times.iter().zip(values).map(|(time, value)| time * value).sum();

    let slope = sum_ty / sum_tt;
    if slope.is_finite() {
        Ok(slope)
    } else {
        Err(OrbitChaosError::fit(format!("slope {slope} is not finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evenly_spaced_indices() {
        let window = FitWindow::EvenlySpaced { count: 10 };
        assert_eq!(window.indices(101), vec![0, 11, 22, 33, 44, 55, 66, 77, 88, 100]);
        assert_eq!(window.indices(4), vec![0, 1, 2, 3]);
        assert_eq!(window.indices(1), vec![0]);
        assert!(window.indices(0).is_empty());
    }

    #[test]
    fn test_first_half_indices() {
        assert_eq!(FitWindow::FirstHalf.indices(7), vec![0, 1, 2]);
        assert!(FitWindow::FirstHalf.indices(1).is_empty());
    }

    #[test]
    fn test_fit_through_origin() {
        let times = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 0.5, 1.0, 1.5];
        assert!((fit_through_origin(&times, &values).unwrap() - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_fit_failures_are_distinct() {
        assert!(matches!(
            fit_through_origin(&[1.0], &[1.0]),
            Err(OrbitChaosError::Fit(_))
        ));
        assert!(matches!(
            fit_through_origin(&[0.0, 0.0], &[1.0, 2.0]),
            Err(OrbitChaosError::Fit(_))
        ));
        assert!(matches!(
            fit_through_origin(&[0.0, 1.0], &[0.0, Scalar::NEG_INFINITY]),
            Err(OrbitChaosError::Fit(_))
        ));
    }

    #[test]
    fn test_lyapunov_time() {
        let result = LyapunovResult {
            exponent: 2.0,
            body: 2,
            reference_sample: 0,
            window: FitWindow::default(),
            times: Vec::new(),
            log_distances: Vec::new(),
            fit_indices: Vec::new(),
        };
        assert_eq!(result.lyapunov_time(), 0.5);
        assert_eq!(result.exponent_per_day(86_400.0), 172_800.0);
    }
}
