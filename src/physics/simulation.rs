//! Fixed-step driver that owns one run's state and records its trajectory

use crate::error::{OrbitChaosError, Result};
use crate::physics::components::SystemState;
use crate::physics::forces::ForceModel;
use crate::physics::integrators::{Integrator, VelocityVerlet};
use crate::physics::math::{Scalar, Vector};
use crate::physics::trajectory::{Snapshot, Trajectory};
use bevy::log::{debug, info};

/// Ratios within this relative distance of an integer count as that integer.
const STEP_RATIO_TOLERANCE: Scalar = 1e-9;

/// Duration, step size and sampling cadence of one run, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    pub duration: Scalar,
    pub time_step: Scalar,
    pub sample_interval: Scalar,
}

/// Step counts derived from [`RunSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    /// `ceil(duration / time_step)`
    pub total_steps: u64,
    /// Steps between recorded samples, `sample_interval / time_step`
    pub sample_stride: u64,
}

impl StepPlan {
    /// Samples a run of this plan records, including the initial condition.
    pub fn sample_count(&self) -> usize {
        (self.total_steps / self.sample_stride) as usize + 1
    }
}

impl RunSettings {
    pub fn new(duration: Scalar, time_step: Scalar, sample_interval: Scalar) -> Self {
        Self {
            duration,
            time_step,
            sample_interval,
        }
    }

    pub fn plan(&self) -> Result<StepPlan> {
        for (name, value) in [
            ("duration", self.duration),
            ("time step", self.time_step),
            ("sample interval", self.sample_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(OrbitChaosError::configuration(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        let stride_ratio = self.sample_interval / self.time_step;
        let stride = stride_ratio.round();
        if stride < 1.0 || (stride_ratio - stride).abs() > STEP_RATIO_TOLERANCE * stride {
            return Err(OrbitChaosError::configuration(format!(
                "sample interval {} s is not an integer multiple of the time step {} s",
                self.sample_interval, self.time_step
            )));
        }

        let step_ratio = self.duration / self.time_step;
        let nearest = step_ratio.round();
        let total_steps = if (step_ratio - nearest).abs() <= STEP_RATIO_TOLERANCE * nearest.max(1.0)
        {
            nearest
        } else {
            step_ratio.ceil()
        };

        Ok(StepPlan {
            total_steps: total_steps as u64,
            sample_stride: stride as u64,
        })
    }
}

/// One simulation run.
///
/// Owns its state exclusively: two `Simulation`s never share arrays, so a
/// baseline and a perturbed run can be stepped independently (or on separate
/// threads). Accelerations are cached between steps so each step performs a
/// single force evaluation, and the scratch buffer is reused across steps.
pub struct Simulation<F: ForceModel> {
    state: SystemState,
    accelerations: Vec<Vector>,
    scratch: Vec<Vector>,
    force: F,
    integrator: VelocityVerlet,
    time_step: Scalar,
    steps_taken: u64,
    sample_stride: u64,
    trajectory: Trajectory,
}

impl<F: ForceModel> Simulation<F> {
    /// Set up a run at t = 0 with sample 0 already recorded.
    ///
    /// `time_step` may be negative to integrate backward in time.
    pub fn new(initial: SystemState, force: F, time_step: Scalar) -> Result<Self> {
        if !(time_step.is_finite() && time_step != 0.0) {
            return Err(OrbitChaosError::configuration(format!(
                "time step must be finite and non-zero, got {time_step}"
            )));
        }

        let accelerations = force.accelerations(initial.positions(), initial.masses());
        let mut trajectory = Trajectory::new(initial.masses().to_vec());
        trajectory.record(Snapshot::capture(0.0, &initial));

        Ok(Self {
            state: initial,
            scratch: vec![Vector::ZERO; accelerations.len()],
            accelerations,
            force,
            integrator: VelocityVerlet,
            time_step,
            steps_taken: 0,
            sample_stride: 1,
            trajectory,
        })
    }

    /// Discard all state and history and start again from `initial`.
    pub fn reset(&mut self, initial: SystemState) {
        self.accelerations = self
            .force
            .accelerations(initial.positions(), initial.masses());
        self.scratch = vec![Vector::ZERO; initial.len()];
        self.trajectory = Trajectory::new(initial.masses().to_vec());
        self.trajectory.record(Snapshot::capture(0.0, &initial));
        self.state = initial;
        self.steps_taken = 0;
        self.sample_stride = 1;
    }

    /// Advance one step, recording a sample if the step falls on the cadence.
    pub fn step(&mut self) {
        self.integrator.step(
            &mut self.state,
            &mut self.accelerations,
            &mut self.scratch,
            &self.force,
            self.time_step,
        );
        self.steps_taken += 1;

        if self.steps_taken % self.sample_stride == 0 {
            self.trajectory
                .record(Snapshot::capture(self.time(), &self.state));
            debug!(
                "Recorded sample {} at step {} (t = {:.0} s)",
                self.trajectory.len() - 1,
                self.steps_taken,
                self.time()
            );
        }
    }

    /// Integrate a fresh run for `duration` seconds, sampling every
    /// `sample_interval` seconds.
    ///
    /// Fails if this simulation has already been stepped; call
    /// [`Simulation::reset`] first.
    pub fn run(&mut self, duration: Scalar, sample_interval: Scalar) -> Result<&Trajectory> {
        if self.steps_taken != 0 {
            return Err(OrbitChaosError::configuration(
                "simulation has already been advanced; reset it before running again",
            ));
        }

        let plan = RunSettings::new(duration, self.time_step, sample_interval).plan()?;
        self.sample_stride = plan.sample_stride;

        info!(
            "Running {} steps of {} s ({} bodies, {} integrator), sampling every {} steps",
            plan.total_steps,
            self.time_step,
            self.state.len(),
            self.integrator.name(),
            plan.sample_stride
        );

        for _ in 0..plan.total_steps {
            self.step();
        }

        info!(
            "Run finished at t = {:.0} s with {} samples",
            self.time(),
            self.trajectory.len()
        );

        Ok(&self.trajectory)
    }

    #[inline]
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    #[inline]
    pub fn accelerations(&self) -> &[Vector] {
        &self.accelerations
    }

    #[inline]
    pub fn time(&self) -> Scalar {
        self.steps_taken as Scalar * self.time_step
    }

    #[inline]
    pub fn time_step(&self) -> Scalar {
        self.time_step
    }

    #[inline]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }
}

/// Build a simulation from `initial`, run it to completion and return its
/// trajectory.
pub fn simulate<F: ForceModel>(
    initial: SystemState,
    force: F,
    settings: &RunSettings,
) -> Result<Trajectory> {
    let mut simulation = Simulation::new(initial, force, settings.time_step)?;
    simulation.run(settings.duration, settings.sample_interval)?;
    Ok(simulation.into_trajectory())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::components::Body;
    use crate::physics::forces::NewtonianGravity;

    fn binary() -> SystemState {
        SystemState::new([
            Body::new(1.0e6, Vector::ZERO, Vector::ZERO),
            Body::new(1.0, Vector::new(10.0, 0.0, 0.0), Vector::new(0.0, 316.2, 0.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_plan_counts() {
        let plan = RunSettings::new(100.0 * 86_400.0, 43_200.0, 10.0 * 86_400.0)
            .plan()
            .unwrap();
        assert_eq!(plan.total_steps, 200);
        assert_eq!(plan.sample_stride, 20);
        assert_eq!(plan.sample_count(), 11);
    }

    #[test]
    fn test_plan_rounds_duration_up() {
        let plan = RunSettings::new(10.5, 1.0, 1.0).plan().unwrap();
        assert_eq!(plan.total_steps, 11);
    }

    #[test]
    fn test_plan_rejects_misaligned_sampling() {
        let result = RunSettings::new(100.0, 2.0, 3.0).plan();
        assert!(matches!(result, Err(OrbitChaosError::Configuration(_))));

        // Sampling more often than stepping
        assert!(RunSettings::new(100.0, 2.0, 1.0).plan().is_err());
        assert!(RunSettings::new(100.0, 0.0, 1.0).plan().is_err());
        assert!(RunSettings::new(-1.0, 1.0, 1.0).plan().is_err());
    }

    #[test]
    fn test_run_samples_on_cadence() {
        let gravity = NewtonianGravity::new(1.0);
        let mut simulation = Simulation::new(binary(), gravity, 0.001).unwrap();
        let trajectory = simulation.run(1.0, 0.1).unwrap();

        assert_eq!(trajectory.len(), 11);
        assert_eq!(trajectory.samples()[0].positions[1], Vector::new(10.0, 0.0, 0.0));
        for (index, time) in trajectory.times().into_iter().enumerate() {
            assert!((time - 0.1 * index as Scalar).abs() < 1e-12);
        }
    }

    #[test]
    fn test_run_requires_fresh_state() {
        let gravity = NewtonianGravity::new(1.0);
        let mut simulation = Simulation::new(binary(), gravity, 0.01).unwrap();
        simulation.step();
        assert!(simulation.run(1.0, 0.1).is_err());

        simulation.reset(binary());
        assert_eq!(simulation.steps_taken(), 0);
        assert_eq!(simulation.trajectory().len(), 1);
        assert!(simulation.run(1.0, 0.1).is_ok());
    }

    #[test]
    fn test_reset_discards_previous_run() {
        let gravity = NewtonianGravity::new(1.0);
        let mut simulation = Simulation::new(binary(), gravity, 0.01).unwrap();
        simulation.run(1.0, 0.5).unwrap();

        let fresh = SystemState::new([Body::new(2.0, Vector::ONE, Vector::ZERO)]).unwrap();
        simulation.reset(fresh.clone());

        assert_eq!(simulation.state(), &fresh);
        assert_eq!(simulation.trajectory().masses(), &[2.0]);
        assert_eq!(simulation.time(), 0.0);
        assert_eq!(simulation.accelerations(), &[Vector::ZERO]);

        // Buffers follow the new body count
        simulation.step();
        assert_eq!(simulation.state().positions(), &[Vector::ONE]);
    }

    #[test]
    fn test_reused_scratch_matches_fresh_buffers() {
        let gravity = NewtonianGravity::new(1.0);
        let mut simulation = Simulation::new(binary(), gravity, 0.001).unwrap();

        let mut state = binary();
        let mut accelerations = gravity.accelerations(state.positions(), state.masses());

        for _ in 0..50 {
            simulation.step();

            let mut fresh = vec![Vector::ZERO; state.len()];
            VelocityVerlet.step(&mut state, &mut accelerations, &mut fresh, &gravity, 0.001);
        }

        assert_eq!(simulation.state(), &state);
        assert_eq!(simulation.accelerations(), accelerations.as_slice());
    }

    #[test]
    fn test_rejects_zero_time_step() {
        let gravity = NewtonianGravity::new(1.0);
        assert!(Simulation::new(binary(), gravity, 0.0).is_err());
    }
}
