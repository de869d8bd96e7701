pub mod study;

pub use study::{ChaosStudyPlugin, MassRatioSweep, StudyOutcome, StudySet, SweepOutcome};
