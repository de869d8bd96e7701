//! N-body physics: state, force law, integration and energy bookkeeping

pub mod components;
pub mod constants;
pub mod energy;
pub mod forces;
pub mod integrators;
pub mod math;
pub mod simulation;
pub mod trajectory;
