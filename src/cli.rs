//! Command line interface for orbitchaos

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use crate::analysis::lyapunov::{DEFAULT_FIT_POINTS, FitWindow};
use crate::config::SimulationConfig;
use crate::error::OrbitChaosError;
use crate::physics::math::Scalar;
use crate::scenario::Perturbation;
use crate::study::{MassRatioPoint, StudyReport};

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be loaded
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(OrbitChaosError),
    /// Command-line overrides produced an unusable configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(OrbitChaosError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FitWindowArg {
    EvenlySpaced,
    FirstHalf,
}

/// orbitchaos - Sun-Earth-Moon divergence and Lyapunov exponent study
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Simulated duration in days (overrides config file)
    #[arg(short = 'd', long, value_name = "DAYS")]
    pub days: Option<Scalar>,

    /// Integration time step in seconds
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<Scalar>,

    /// Days between recorded samples
    #[arg(long, value_name = "DAYS")]
    pub sample_days: Option<Scalar>,

    /// Scale the perturbed body's velocity by this factor
    #[arg(short = 'f', long, value_name = "FACTOR")]
    pub perturbation_factor: Option<Scalar>,

    /// Seed for random-direction perturbations
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Which samples enter the Lyapunov fit
    #[arg(long, value_enum, value_name = "POLICY")]
    pub fit_window: Option<FitWindowArg>,

    /// Number of evenly spaced fit points
    #[arg(long, value_name = "COUNT")]
    pub fit_points: Option<usize>,

    /// Directory to write baseline.json, perturbed.json and report.json into
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Moon/Earth mass ratios to sweep after the main study, comma separated
    #[arg(long, value_name = "RATIOS", value_delimiter = ',')]
    pub mass_ratios: Vec<Scalar>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {}", config_path.display());
        SimulationConfig::load(Some(config_path.as_path())).map_err(CliError::ConfigLoad)?
    } else {
        SimulationConfig::load_from_user_config().map_err(CliError::ConfigLoad)?
    };

    if let Some(days) = args.days {
        println!("Overriding duration to: {days} days");
        config.integration.duration_days = days;
    }

    if let Some(dt) = args.dt {
        println!("Overriding time step to: {dt} s");
        config.integration.time_step = dt;
    }

    if let Some(sample_days) = args.sample_days {
        println!("Overriding sample interval to: {sample_days} days");
        config.integration.sample_interval_days = sample_days;
    }

    if let Some(factor) = args.perturbation_factor {
        println!("Using velocity perturbation factor: {factor}");
        config.perturbation = Perturbation::VelocityScale {
            body: config.perturbation.body(),
            factor,
        };
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.perturbation = config.perturbation.with_seed(seed);
    }

    let current_count = match config.analysis.fit_window {
        FitWindow::EvenlySpaced { count } => count,
        FitWindow::FirstHalf => DEFAULT_FIT_POINTS,
    };
    match (args.fit_window, args.fit_points) {
        (Some(FitWindowArg::FirstHalf), _) => {
            config.analysis.fit_window = FitWindow::FirstHalf;
        }
        (Some(FitWindowArg::EvenlySpaced), count) | (None, count @ Some(_)) => {
            config.analysis.fit_window = FitWindow::EvenlySpaced {
                count: count.unwrap_or(current_count),
            };
        }
        (None, None) => {}
    }

    config.validate().map_err(CliError::InvalidConfig)?;
    Ok(config)
}

/// Human-readable summary of a finished study
pub fn format_summary(report: &StudyReport) -> String {
    let constants = &report.config.constants;
    let mut lines = vec![
        format!("Report generated at {}", report.generated_at),
        format!(
            "Lyapunov exponent (body {}): {:.6e} 1/day",
            report.lyapunov.body, report.exponent_per_day
        ),
        format!(
            "Lyapunov time: {:.1} days",
            constants.seconds_to_days(report.lyapunov.lyapunov_time())
        ),
        format!(
            "Final separation: {:.3e} m",
            report.separation.separations.last().copied().unwrap_or(0.0)
        ),
        format!(
            "Baseline energy drift: {:.3e}",
            report.baseline_energy_drift()
        ),
    ];

    for orbit in &report.orbits {
        lines.push(format!(
            "Body {} about body {}: mean distance {:.6e} m, spread {:.4e}",
            orbit.pair.body,
            orbit.pair.primary,
            orbit.baseline_radial.mean_distance,
            orbit.baseline_radial.relative_spread
        ));
        if let Some(elements) = orbit.baseline_elements.last() {
            lines.push(format!(
                "  final elements: a = {:.6e} m, e = {:.6}, i = {:.4} rad",
                elements.semi_major_axis, elements.eccentricity, elements.inclination
            ));
        }
    }

    lines.join("\n")
}

pub fn format_sweep(points: &[MassRatioPoint]) -> String {
    let mut lines = vec!["mass ratio    exponent (1/day)".to_string()];
    lines.extend(
        points
            .iter()
            .map(|point| format!("{:<12.5} {:.6e}", point.ratio, point.exponent_per_day)),
    );
    lines.join("\n")
}
