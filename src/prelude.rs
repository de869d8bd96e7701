//! orbitchaos prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across the crate to reduce import boilerplate.

// Internal re-exports - Config and errors
pub use crate::config::SimulationConfig;
pub use crate::error::{OrbitChaosError, Result};

// Internal re-exports - Physics
pub use crate::physics::components::{Body, SystemState};
pub use crate::physics::constants::PhysicalConstants;
pub use crate::physics::energy::{EnergySeries, total_energy};
pub use crate::physics::forces::{ForceModel, NewtonianGravity};
pub use crate::physics::integrators::{Integrator, VelocityVerlet};
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::simulation::{RunSettings, Simulation, simulate};
pub use crate::physics::trajectory::{Snapshot, Trajectory};

// Internal re-exports - Analysis
pub use crate::analysis::{
    FitWindow, LyapunovEstimator, LyapunovResult, OrbitPair, OrbitalElements, SeparationSeries,
    lyapunov,
};

// Internal re-exports - Scenario and study
pub use crate::plugins::{ChaosStudyPlugin, StudyOutcome};
pub use crate::scenario::{EARTH, InitialConditions, MOON, Perturbation, SUN, SunEarthMoon};
pub use crate::study::{StudyOutput, StudyReport, run_study};
