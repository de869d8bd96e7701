//! Baseline vs. perturbed divergence study over the Sun–Earth–Moon system

use crate::analysis::divergence::{SeparationSeries, check_paired};
use crate::analysis::lyapunov::LyapunovResult;
use crate::analysis::orbital_elements::{
    OrbitPair, OrbitalElements, RadialSummary, element_series, radial_summary,
};
use crate::config::SimulationConfig;
use crate::error::{OrbitChaosError, Result};
use crate::instrumentation::timed;
use crate::physics::energy::EnergySeries;
use crate::physics::math::Scalar;
use crate::physics::simulation::simulate;
use crate::physics::trajectory::Trajectory;
use crate::scenario::InitialConditions;
use bevy::log::{info, warn};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const BASELINE_FILE: &str = "baseline.json";
pub const PERTURBED_FILE: &str = "perturbed.json";
pub const REPORT_FILE: &str = "report.json";

/// Orbit of one pair in both runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitReport {
    pub pair: OrbitPair,
    pub baseline_elements: Vec<OrbitalElements>,
    pub perturbed_elements: Vec<OrbitalElements>,
    pub baseline_radial: RadialSummary,
    pub perturbed_radial: RadialSummary,
}

/// Everything derived from one pair of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    /// RFC 3339 local time the report was produced
    pub generated_at: String,
    pub config: SimulationConfig,
    pub lyapunov: LyapunovResult,
    pub exponent_per_day: Scalar,
    pub separation: SeparationSeries,
    pub baseline_energy: EnergySeries,
    pub perturbed_energy: EnergySeries,
    pub orbits: Vec<OrbitReport>,
}

impl StudyReport {
    pub fn baseline_energy_drift(&self) -> Scalar {
        self.baseline_energy.max_relative_drift()
    }
}

/// A report together with the trajectories it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyOutput {
    pub report: StudyReport,
    pub baseline: Trajectory,
    pub perturbed: Trajectory,
}

/// Run the baseline and the perturbed simulation and analyse their divergence.
pub fn run_study(config: &SimulationConfig) -> Result<StudyOutput> {
    config.validate()?;

    let initial = InitialConditions::new(&config.scenario, &config.perturbation)?;
    let settings = config.run_settings();

    let baseline = timed("baseline run", || {
        simulate(initial.baseline, config.gravity(), &settings)
    })?;
    let perturbed = timed("perturbed run", || {
        simulate(initial.perturbed, config.gravity(), &settings)
    })?;

    let report = analyse(config, &baseline, &perturbed)?;

    Ok(StudyOutput {
        report,
        baseline,
        perturbed,
    })
}

/// Derive a [`StudyReport`] from two already recorded runs.
pub fn analyse(
    config: &SimulationConfig,
    baseline: &Trajectory,
    perturbed: &Trajectory,
) -> Result<StudyReport> {
    check_paired(baseline, perturbed)?;
    let gravitational_constant = config.constants.gravitational_constant;
    let analysis = &config.analysis;

    let separation = SeparationSeries::between(baseline, perturbed, analysis.body_of_interest)?;
    let Some(reference) = separation.first_separated_sample(analysis.separation_floor) else {
        return Err(OrbitChaosError::invalid_input(format!(
            "body {} never separates by more than {:e} m between the runs",
            analysis.body_of_interest, analysis.separation_floor
        )));
    };
    if reference > 0 {
        info!(
            "Initial positions coincide; measuring divergence from sample {reference} (t = {:.0} s)",
            separation.times[reference]
        );
    }

    let lyapunov = analysis.estimator().estimate_series(&separation, reference)?;
    let exponent_per_day = lyapunov.exponent_per_day(config.constants.seconds_per_day);
    info!("Lyapunov exponent of body {}: {exponent_per_day:e} 1/day", lyapunov.body);

    let baseline_energy = EnergySeries::from_trajectory(baseline, gravitational_constant);
    let perturbed_energy = EnergySeries::from_trajectory(perturbed, gravitational_constant);
    let drift = baseline_energy.max_relative_drift();
    if drift > 1e-3 {
        warn!("Baseline energy drifted by {drift:e}; consider a smaller time step");
    } else {
        info!("Baseline energy drift: {drift:e}");
    }

    let orbits = analysis
        .orbits
        .iter()
        .map(|&pair| {
            Ok(OrbitReport {
                pair,
                baseline_elements: element_series(baseline, pair, gravitational_constant)?,
                perturbed_elements: element_series(perturbed, pair, gravitational_constant)?,
                baseline_radial: radial_summary(baseline, pair)?,
                perturbed_radial: radial_summary(perturbed, pair)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StudyReport {
        generated_at: Local::now().to_rfc3339(),
        config: config.clone(),
        lyapunov,
        exponent_per_day,
        separation,
        baseline_energy,
        perturbed_energy,
        orbits,
    })
}

/// Measured exponent for one Moon/Earth mass ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassRatioPoint {
    pub ratio: Scalar,
    pub exponent: Scalar,
    pub exponent_per_day: Scalar,
}

/// Repeat the study with the Moon's mass set to each `ratio` × Earth mass.
pub fn sweep_mass_ratio(config: &SimulationConfig, ratios: &[Scalar]) -> Result<Vec<MassRatioPoint>> {
    ratios
        .iter()
        .map(|&ratio| {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(OrbitChaosError::configuration(format!(
                    "mass ratio must be positive, got {ratio}"
                )));
            }

            let mut config = config.clone();
            config.scenario = config.scenario.with_mass_ratio(ratio);
            let output = timed(&format!("mass ratio {ratio}"), || run_study(&config))?;

            Ok(MassRatioPoint {
                ratio,
                exponent: output.report.lyapunov.exponent,
                exponent_per_day: output.report.exponent_per_day,
            })
        })
        .collect()
}

/// Write both trajectories and the report as JSON into `directory`,
/// creating it if needed. Returns the written paths.
pub fn write_results(output: &StudyOutput, directory: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    std::fs::create_dir_all(directory)?;

    let baseline_path = directory.join(BASELINE_FILE);
    let perturbed_path = directory.join(PERTURBED_FILE);
    let report_path = directory.join(REPORT_FILE);

    output.baseline.save_json(&baseline_path)?;
    output.perturbed.save_json(&perturbed_path)?;
    std::fs::write(&report_path, serde_json::to_string_pretty(&output.report)?)?;

    info!("Wrote results to {}", directory.display());
    Ok(vec![baseline_path, perturbed_path, report_path])
}
