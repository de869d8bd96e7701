//! Test utilities for plugin and study testing

use bevy::prelude::*;

use crate::config::SimulationConfig;

/// Creates a bare headless app; plugins under test are added by the caller
pub fn create_test_app() -> App {
    App::new()
}

/// Default Sun–Earth–Moon configuration shortened to 200 days sampled every 10
pub fn short_study_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.integration.duration_days = 200.0;
    config.integration.sample_interval_days = 10.0;
    config
}
