//! Post-processing of recorded trajectories

pub mod divergence;
pub mod lyapunov;
pub mod orbital_elements;

pub use divergence::SeparationSeries;
pub use lyapunov::{FitWindow, LyapunovEstimator, LyapunovResult, lyapunov};
pub use orbital_elements::{OrbitPair, OrbitalElements, RadialSummary};
