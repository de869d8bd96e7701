use crate::config::SimulationConfig;
use crate::error::Result;
use crate::physics::math::Scalar;
use crate::study::{MassRatioPoint, StudyOutput, run_study, sweep_mass_ratio};
use bevy::log::{debug, error, info};
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StudySet {
    Run,
    Sweep,
}

/// Result of the baseline/perturbed study, inserted once startup completes.
#[derive(Resource, Debug)]
pub struct StudyOutcome(pub Result<StudyOutput>);

/// Moon/Earth mass ratios to sweep after the main study. Empty skips the sweep.
#[derive(Resource, Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct MassRatioSweep(pub Vec<Scalar>);

#[derive(Resource, Debug)]
pub struct SweepOutcome(pub Result<Vec<MassRatioPoint>>);

/// Runs the divergence study headlessly during `Startup`.
pub struct ChaosStudyPlugin {
    pub config: SimulationConfig,
    pub mass_ratios: Vec<Scalar>,
}

impl ChaosStudyPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            mass_ratios: Vec::new(),
        }
    }

    pub fn with_mass_ratios(mut self, mass_ratios: Vec<Scalar>) -> Self {
        self.mass_ratios = mass_ratios;
        self
    }
}

impl Plugin for ChaosStudyPlugin {
    fn build(&self, app: &mut App) {
        match toml::to_string_pretty(&self.config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        app.insert_resource(self.config.clone());
        app.insert_resource(MassRatioSweep(self.mass_ratios.clone()));

        app.configure_sets(Startup, (StudySet::Run, StudySet::Sweep).chain());
        app.add_systems(Startup, run_study_system.in_set(StudySet::Run));
        app.add_systems(
            Startup,
            run_sweep_system
                .in_set(StudySet::Sweep)
                .run_if(|sweep: Res<MassRatioSweep>| !sweep.is_empty()),
        );
    }
}

fn run_study_system(mut commands: Commands, config: Res<SimulationConfig>) {
    let outcome = run_study(&config);
    match &outcome {
        Ok(output) => info!(
            "Study complete: λ = {:e} 1/day",
            output.report.exponent_per_day
        ),
        Err(e) => error!("Study failed: {e}"),
    }
    commands.insert_resource(StudyOutcome(outcome));
}

fn run_sweep_system(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    sweep: Res<MassRatioSweep>,
) {
    info!("Sweeping {} mass ratios", sweep.len());
    let outcome = sweep_mass_ratio(&config, &sweep);
    if let Err(e) = &outcome {
        error!("Mass-ratio sweep failed: {e}");
    }
    commands.insert_resource(SweepOutcome(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, short_study_config};

    #[test]
    fn test_plugin_runs_study_on_startup() {
        let mut app = create_test_app();
        app.add_plugins(ChaosStudyPlugin::new(short_study_config()));

        assert!(app.world().get_resource::<StudyOutcome>().is_none());
        app.update();

        let outcome = app.world().resource::<StudyOutcome>();
        let output = outcome.0.as_ref().unwrap();
        assert!(output.report.lyapunov.exponent.is_finite());
        assert!(app.world().get_resource::<SweepOutcome>().is_none());
    }

    #[test]
    fn test_plugin_runs_sweep_when_requested() {
        let mut app = create_test_app();
        app.add_plugins(
            ChaosStudyPlugin::new(short_study_config()).with_mass_ratios(vec![0.01, 0.02]),
        );
        app.update();

        let sweep = app.world().resource::<SweepOutcome>();
        let points = sweep.0.as_ref().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].ratio, 0.01);
    }

    #[test]
    fn test_invalid_config_surfaces_as_error() {
        let mut config = short_study_config();
        config.integration.time_step = 7_000.0;

        let mut app = create_test_app();
        app.add_plugins(ChaosStudyPlugin::new(config));
        app.update();

        assert!(app.world().resource::<StudyOutcome>().0.is_err());
    }
}
