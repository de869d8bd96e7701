//! orbitchaos library
//!
//! Sun–Earth–Moon N-body integration, orbital-element extraction and
//! trajectory-divergence analysis, exposed as a library so the binary,
//! integration tests and benchmarks share one implementation.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod instrumentation;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod scenario;
pub mod study;

// Test utilities are public for integration tests
pub mod test_utils;
