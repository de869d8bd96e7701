use crate::analysis::lyapunov::{DEFAULT_SEPARATION_FLOOR, FitWindow, LyapunovEstimator};
use crate::analysis::orbital_elements::OrbitPair;
use crate::error::{OrbitChaosError, Result};
use crate::physics::constants::PhysicalConstants;
use crate::physics::forces::{DEFAULT_MIN_SEPARATION, NewtonianGravity};
use crate::physics::math::Scalar;
use crate::physics::simulation::RunSettings;
use crate::scenario::{EARTH, MOON, Perturbation, SUN, SunEarthMoon};
use bevy::log::{info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENVIRONMENT_PREFIX: &str = "ORBITCHAOS";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub constants: PhysicalConstants,
    pub scenario: SunEarthMoon,
    pub integration: IntegrationConfig,
    pub perturbation: Perturbation,
    pub analysis: AnalysisConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Seconds per integration step
    pub time_step: Scalar,
    pub duration_days: Scalar,
    pub sample_interval_days: Scalar,
    /// Pairs closer than this (m) exert no force on each other
    pub min_separation: Scalar,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            time_step: 43_200.0,
            duration_days: 10_000.0,
            sample_interval_days: 100.0,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }
}

impl IntegrationConfig {
    pub fn run_settings(&self, constants: &PhysicalConstants) -> RunSettings {
        RunSettings::new(
            constants.days_to_seconds(self.duration_days),
            self.time_step,
            constants.days_to_seconds(self.sample_interval_days),
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Body whose baseline/perturbed separation feeds the exponent fit
    pub body_of_interest: usize,
    pub fit_window: FitWindow,
    pub separation_floor: Scalar,
    pub orbits: Vec<OrbitPair>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            body_of_interest: MOON,
            fit_window: FitWindow::default(),
            separation_floor: DEFAULT_SEPARATION_FLOOR,
            orbits: vec![OrbitPair::new(EARTH, SUN), OrbitPair::new(MOON, EARTH)],
        }
    }
}

impl AnalysisConfig {
    pub fn estimator(&self) -> LyapunovEstimator {
        LyapunovEstimator::new(self.fit_window).with_separation_floor(self.separation_floor)
    }
}

impl SimulationConfig {
    /// Layer defaults, an optional TOML file and `ORBITCHAOS_*` environment
    /// variables (nested keys separated by `__`, e.g.
    /// `ORBITCHAOS_INTEGRATION__TIME_STEP=3600`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENVIRONMENT_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults only when the
    /// file does not exist. A file that fails to parse or validate is an error.
    pub fn load_if_present(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {} not found. Using defaults.", path.display());
            return Ok(Self::default());
        }

        info!("Loading configuration from {}", path.display());
        Self::load(Some(path))
    }

    /// Platform-specific location of the user's `config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "orbitchaos")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn load_from_user_config() -> Result<Self> {
        match Self::user_config_path() {
            Some(path) => Self::load_if_present(path),
            None => {
                warn!("Could not determine a config directory. Using defaults.");
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn gravity(&self) -> NewtonianGravity {
        NewtonianGravity::from_constants(&self.constants)
            .with_min_separation(self.integration.min_separation)
    }

    pub fn run_settings(&self) -> RunSettings {
        self.integration.run_settings(&self.constants)
    }

    /// Reject configurations that cannot produce a run before any work starts.
    pub fn validate(&self) -> Result<()> {
        self.constants.validate()?;
        self.scenario.system_state()?;
        self.perturbation.validate()?;
        self.run_settings().plan()?;

        if !(self.integration.min_separation.is_finite() && self.integration.min_separation >= 0.0)
        {
            return Err(OrbitChaosError::configuration(format!(
                "min_separation must be non-negative, got {}",
                self.integration.min_separation
            )));
        }
        if !(self.analysis.separation_floor.is_finite() && self.analysis.separation_floor > 0.0) {
            return Err(OrbitChaosError::configuration(format!(
                "separation_floor must be positive, got {}",
                self.analysis.separation_floor
            )));
        }

        let bodies = self.scenario.bodies().len();
        let indices = std::iter::once(self.analysis.body_of_interest)
            .chain(std::iter::once(self.perturbation.body()))
            .chain(
                self.analysis
                    .orbits
                    .iter()
                    .flat_map(|pair| [pair.body, pair.primary]),
            );
        for index in indices {
            if index >= bodies {
                return Err(OrbitChaosError::configuration(format!(
                    "body index {index} is out of range for {bodies} bodies"
                )));
            }
        }
        if let FitWindow::EvenlySpaced { count: count @ 0..2 } = self.analysis.fit_window {
            return Err(OrbitChaosError::configuration(format!(
                "an evenly spaced fit window needs at least 2 points, got {count}"
            )));
        }
        if let Some(pair) = self.analysis.orbits.iter().find(|pair| pair.body == pair.primary) {
            return Err(OrbitChaosError::configuration(format!(
                "orbit pair {pair:?} uses the same body twice"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());

        let plan = config.run_settings().plan().unwrap();
        assert_eq!(plan.total_steps, 20_000);
        assert_eq!(plan.sample_stride, 200);
    }

    #[test]
    fn test_misaligned_sampling_is_a_configuration_error() {
        let mut config = SimulationConfig::default();
        config.integration.time_step = 7_000.0;
        assert!(matches!(
            config.validate(),
            Err(OrbitChaosError::Configuration(_))
        ));
    }

    #[test]
    fn test_out_of_range_indices_are_rejected() {
        let mut config = SimulationConfig::default();
        config.analysis.body_of_interest = 3;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.analysis.orbits.push(OrbitPair::new(1, 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fit_window_needs_two_points() {
        let mut config = SimulationConfig::default();
        for count in [0, 1] {
            config.analysis.fit_window = FitWindow::EvenlySpaced { count };
            assert!(matches!(
                config.validate(),
                Err(OrbitChaosError::Configuration(_))
            ));
        }

        config.analysis.fit_window = FitWindow::EvenlySpaced { count: 2 };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[integration]\nduration_days = 200.0\n\n[analysis.fit_window]\npolicy = \"first_half\"\n"
        )
        .unwrap();

        let config = SimulationConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.integration.duration_days, 200.0);
        assert_eq!(config.integration.time_step, 43_200.0);
        assert_eq!(config.analysis.fit_window, FitWindow::FirstHalf);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("nested").join("config.toml");

        let mut config = SimulationConfig::default();
        config.integration.duration_days = 500.0;
        config.perturbation = Perturbation::RandomVelocity {
            body: MOON,
            magnitude: 0.1,
            seed: Some(9),
        };
        config.save(&path).unwrap();

        let loaded = SimulationConfig::load_if_present(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = SimulationConfig::load_if_present("/nonexistent/orbitchaos.toml").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_invalid_existing_file_is_an_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[integration]\ntime_step = 7000.0\n").unwrap();
        assert!(matches!(
            SimulationConfig::load_if_present(file.path()),
            Err(OrbitChaosError::Configuration(_))
        ));

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[integration\ntime_step = ").unwrap();
        assert!(SimulationConfig::load_if_present(file.path()).is_err());
    }
}
