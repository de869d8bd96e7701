//! Sun–Earth–Moon initial conditions and the perturbations applied to them

use crate::error::{OrbitChaosError, Result};
use crate::physics::components::{Body, SystemState};
use crate::physics::math::{Scalar, Vector, is_finite_vector, random_unit_vector};
use crate::resources::SharedRng;
use bevy::log::info;
use serde::{Deserialize, Serialize};

pub const SUN: usize = 0;
pub const EARTH: usize = 1;
pub const MOON: usize = 2;

/// Heliocentric Sun–Earth–Moon setup in SI units.
///
/// Body order is Sun, Earth, Moon ([`SUN`], [`EARTH`], [`MOON`]). The Moon is
/// placed relative to the Earth.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct SunEarthMoon {
    pub sun_mass: Scalar,
    pub earth_mass: Scalar,
    pub moon_mass: Scalar,
    pub earth_position: Vector,
    pub earth_velocity: Vector,
    pub moon_offset: Vector,
    pub moon_relative_velocity: Vector,
}

impl Default for SunEarthMoon {
    fn default() -> Self {
        Self {
            sun_mass: 1.989e30,
            earth_mass: 5.972e24,
            moon_mass: 7.342e22,
            earth_position: Vector::new(1.496e11, 0.0, 0.0),
            earth_velocity: Vector::new(0.0, 29_783.0, 0.0),
            moon_offset: Vector::new(3.844e8, 0.0, 0.0),
            moon_relative_velocity: Vector::new(0.0, 1_022.0, 0.0),
        }
    }
}

impl SunEarthMoon {
    pub fn bodies(&self) -> [Body; 3] {
        [
            Body::new(self.sun_mass, Vector::ZERO, Vector::ZERO),
            Body::new(self.earth_mass, self.earth_position, self.earth_velocity),
            Body::new(
                self.moon_mass,
                self.earth_position + self.moon_offset,
                self.earth_velocity + self.moon_relative_velocity,
            ),
        ]
    }

    pub fn system_state(&self) -> Result<SystemState> {
        SystemState::new(self.bodies())
    }

    /// Same setup with the Moon's mass set to `ratio` Earth masses.
    pub fn with_mass_ratio(mut self, ratio: Scalar) -> Self {
        self.moon_mass = ratio * self.earth_mass;
        self
    }

    pub fn mass_ratio(&self) -> Scalar {
        self.moon_mass / self.earth_mass
    }
}

/// Small deliberate change to an initial condition.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Perturbation {
    /// Multiply a body's velocity by `factor`.
    VelocityScale { body: usize, factor: Scalar },
    /// Add `offset` (m/s) to a body's velocity.
    VelocityOffset { body: usize, offset: Vector },
    /// Add `offset` (m) to a body's position.
    PositionOffset { body: usize, offset: Vector },
    /// Add a velocity kick of `magnitude` (m/s) in a random direction.
    /// Without a `seed` the direction differs between runs.
    RandomVelocity {
        body: usize,
        magnitude: Scalar,
        seed: Option<u64>,
    },
}

impl Default for Perturbation {
    fn default() -> Self {
        Self::VelocityScale {
            body: MOON,
            factor: 1.0005,
        }
    }
}

impl Perturbation {
    pub fn body(&self) -> usize {
        match *self {
            Self::VelocityScale { body, .. }
            | Self::VelocityOffset { body, .. }
            | Self::PositionOffset { body, .. }
            | Self::RandomVelocity { body, .. } => body,
        }
    }

    /// Replace the seed of a random perturbation; other kinds are unaffected.
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            Self::RandomVelocity {
                body, magnitude, ..
            } => Self::RandomVelocity {
                body,
                magnitude,
                seed: Some(seed),
            },
            other => other,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let valid = match *self {
            Self::VelocityScale { factor, .. } => factor.is_finite(),
            Self::VelocityOffset { offset, .. } | Self::PositionOffset { offset, .. } => {
                is_finite_vector(offset)
            }
            Self::RandomVelocity { magnitude, .. } => magnitude.is_finite() && magnitude >= 0.0,
        };
        if valid {
            Ok(())
        } else {
            Err(OrbitChaosError::configuration(format!(
                "perturbation {self:?} has a non-finite or negative parameter"
            )))
        }
    }

    /// A copy of `initial` with this perturbation applied.
    pub fn apply(&self, initial: &SystemState) -> Result<SystemState> {
        self.validate()?;
        initial.check_index(self.body())?;

        let mut bodies: Vec<Body> = initial.bodies().collect();
        let body = &mut bodies[self.body()];
        match *self {
            Self::VelocityScale { factor, .. } => body.velocity *= factor,
            Self::VelocityOffset { offset, .. } => body.velocity += offset,
            Self::PositionOffset { offset, .. } => body.position += offset,
            Self::RandomVelocity {
                magnitude, seed, ..
            } => {
                let mut rng = SharedRng::from_optional_seed(seed);
                body.velocity += random_unit_vector(&mut rng) * magnitude;
            }
        }

        SystemState::new(bodies)
    }
}

/// Baseline and perturbed starting states for one divergence study.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    pub baseline: SystemState,
    pub perturbed: SystemState,
}

impl InitialConditions {
    pub fn new(scenario: &SunEarthMoon, perturbation: &Perturbation) -> Result<Self> {
        let baseline = scenario.system_state()?;
        let perturbed = perturbation.apply(&baseline)?;
        info!("Prepared initial conditions with perturbation {perturbation:?}");
        Ok(Self {
            baseline,
            perturbed,
        })
    }
}
