//! Physical constants passed explicitly into setup and force code

use crate::error::{OrbitChaosError, Result};
use crate::physics::math::Scalar;
use serde::{Deserialize, Serialize};

/// Immutable physical constants for one simulation.
///
/// Nothing in the crate reads these from global state; each run receives its
/// own copy, so runs with different constants can coexist.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Newtonian gravitational constant (m³ kg⁻¹ s⁻²)
    pub gravitational_constant: Scalar,
    /// Astronomical unit (m)
    pub astronomical_unit: Scalar,
    /// Length of a day (s)
    pub seconds_per_day: Scalar,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.67430e-11,
            astronomical_unit: 1.495_978_707e11,
            seconds_per_day: 86_400.0,
        }
    }
}

impl PhysicalConstants {
    #[inline]
    pub fn days_to_seconds(&self, days: Scalar) -> Scalar {
        days * self.seconds_per_day
    }

    #[inline]
    pub fn seconds_to_days(&self, seconds: Scalar) -> Scalar {
        seconds / self.seconds_per_day
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("gravitational_constant", self.gravitational_constant),
            ("astronomical_unit", self.astronomical_unit),
            ("seconds_per_day", self.seconds_per_day),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(OrbitChaosError::configuration(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}
