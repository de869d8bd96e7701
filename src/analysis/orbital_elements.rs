//! Classical orbital elements from Cartesian state vectors

use crate::error::{OrbitChaosError, Result};
use crate::physics::math::{Scalar, TAU, Vector, clamped_acos};
use crate::physics::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

/// Magnitudes below this fraction of their natural scale are treated as zero
/// when choosing the degenerate branches.
const DEGENERACY_TOLERANCE: Scalar = 1e-12;

/// Osculating two-body elements of a secondary relative to its primary.
///
/// Angles are in radians; `semi_major_axis` is in metres and is `+∞` for
/// unbound (parabolic or hyperbolic) orbits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Sample time (s) the state vectors were taken from
    pub time: Scalar,
    pub semi_major_axis: Scalar,
    pub eccentricity: Scalar,
    pub inclination: Scalar,
    pub ascending_node_longitude: Scalar,
    pub argument_of_periapsis: Scalar,
}

impl OrbitalElements {
    /// Elements of the orbit with relative position `position` and relative
    /// velocity `velocity` about a primary of mass `primary_mass`.
    ///
    /// Degenerate geometry falls back to fixed values instead of failing:
    /// * `|h| = 0` (radial motion): inclination is 0
    /// * `|n| = 0` (equatorial orbit): ascending node is 0
    /// * `e = 0` or `|n| = 0`: argument of periapsis is 0
    pub fn from_state_vectors(
        position: Vector,
        velocity: Vector,
        primary_mass: Scalar,
        gravitational_constant: Scalar,
    ) -> Self {
        let mu = gravitational_constant * primary_mass;
        let radius = position.length();
        let speed_squared = velocity.length_squared();

        let specific_energy = 0.5 * speed_squared - mu / radius;
        let semi_major_axis = if specific_energy < 0.0 {
            -mu / (2.0 * specific_energy)
        } else {
            Scalar::INFINITY
        };

        let angular_momentum = position.cross(velocity);
        let h = angular_momentum.length();

        let eccentricity_vector =
            (position * (speed_squared - mu / radius) - velocity * position.dot(velocity)) / mu;
        let eccentricity = eccentricity_vector.length();

        let radial_orbit = h <= DEGENERACY_TOLERANCE * radius * speed_squared.sqrt();
        let inclination = if radial_orbit {
            0.0
        } else {
            clamped_acos(angular_momentum.z / h)
        };

        let node = Vector::Z.cross(angular_momentum);
        let n = node.length();
        let equatorial = radial_orbit || n <= DEGENERACY_TOLERANCE * h;

        let ascending_node_longitude = if equatorial {
            0.0
        } else {
            let omega = clamped_acos(node.x / n);
            if node.y < 0.0 { TAU - omega } else { omega }
        };

        let circular = eccentricity <= DEGENERACY_TOLERANCE;
        let argument_of_periapsis = if circular || equatorial {
            0.0
        } else {
            let omega = clamped_acos(node.dot(eccentricity_vector) / (n * eccentricity));
            if eccentricity_vector.z < 0.0 {
                TAU - omega
            } else {
                omega
            }
        };

        Self {
            time: 0.0,
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude,
            argument_of_periapsis,
        }
    }

    pub fn with_time(mut self, time: Scalar) -> Self {
        self.time = time;
        self
    }

    pub fn is_bound(&self) -> bool {
        self.semi_major_axis.is_finite()
    }
}

/// A secondary body and the primary its orbit is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitPair {
    pub body: usize,
    pub primary: usize,
}

impl OrbitPair {
    pub fn new(body: usize, primary: usize) -> Self {
        Self { body, primary }
    }

    fn check(&self, trajectory: &Trajectory) -> Result<()> {
        trajectory.check_body(self.body)?;
        trajectory.check_body(self.primary)?;
        if self.body == self.primary {
            return Err(OrbitChaosError::configuration(format!(
                "body {} cannot orbit itself",
                self.body
            )));
        }
        Ok(())
    }
}

/// Elements of `pair` at every sample of `trajectory`.
pub fn element_series(
    trajectory: &Trajectory,
    pair: OrbitPair,
    gravitational_constant: Scalar,
) -> Result<Vec<OrbitalElements>> {
    pair.check(trajectory)?;
    let primary_mass = trajectory.masses()[pair.primary];

    Ok(trajectory
        .samples()
        .iter()
        .map(|sample| {
            OrbitalElements::from_state_vectors(
                sample.positions[pair.body] - sample.positions[pair.primary],
                sample.velocities[pair.body] - sample.velocities[pair.primary],
                primary_mass,
                gravitational_constant,
            )
            .with_time(sample.time)
        })
        .collect())
}

/// Crude orbit-size summary from the sampled relative distances alone.
///
/// `mean_distance` approximates the semi-major axis and `relative_spread`
/// (standard deviation over mean) approximates the eccentricity. Useful as a
/// cross-check against [`OrbitalElements`], not as a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialSummary {
    pub mean_distance: Scalar,
    pub relative_spread: Scalar,
}

impl RadialSummary {
    pub fn from_distances(distances: &[Scalar]) -> Result<Self> {
        if distances.is_empty() {
            return Err(OrbitChaosError::invalid_input(
                "no distances to summarize",
            ));
        }

        let count = distances.len() as Scalar;
        let mean_distance = distances.iter().sum::<Scalar>() / count;
        let variance = distances
            .iter()
            .map(|distance| (distance - mean_distance).powi(2))
            .sum::<Scalar>()
            / count;

        Ok(Self {
            mean_distance,
            relative_spread: variance.sqrt() / mean_distance,
        })
    }
}

pub fn radial_summary(trajectory: &Trajectory, pair: OrbitPair) -> Result<RadialSummary> {
    pair.check(trajectory)?;
    let distances: Vec<Scalar> = trajectory
        .samples()
        .iter()
        .map(|sample| (sample.positions[pair.body] - sample.positions[pair.primary]).length())
        .collect();
    RadialSummary::from_distances(&distances)
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: Scalar = 6.67430e-11;
    const SUN: Scalar = 1.989e30;

    #[test]
    fn test_eccentric_orbit_at_periapsis() {
        let mu = G * SUN;
        let a = 1.5e11;
        let e = 0.2;
        let periapsis = a * (1.0 - e);
        let speed = (mu * (1.0 + e) / periapsis).sqrt();

        let elements = OrbitalElements::from_state_vectors(
            Vector::new(periapsis, 0.0, 0.0),
            Vector::new(0.0, speed, 0.0),
            SUN,
            G,
        );

        assert!((elements.semi_major_axis - a).abs() / a < 1e-10);
        assert!((elements.eccentricity - e).abs() < 1e-10);
        assert_eq!(elements.inclination, 0.0);
        // Equatorial: node and periapsis argument fall back to zero
        assert_eq!(elements.ascending_node_longitude, 0.0);
        assert_eq!(elements.argument_of_periapsis, 0.0);
    }

    #[test]
    fn test_unbound_orbit_has_infinite_axis() {
        let escape = (2.0 * G * SUN / 1.0e11).sqrt();
        let elements = OrbitalElements::from_state_vectors(
            Vector::new(1.0e11, 0.0, 0.0),
            Vector::new(0.0, escape * 1.1, 0.0),
            SUN,
            G,
        );
        assert!(elements.semi_major_axis.is_infinite());
        assert!(!elements.is_bound());
        assert!(elements.eccentricity > 1.0);
    }

    #[test]
    fn test_radial_orbit_has_zero_angles() {
        let elements = OrbitalElements::from_state_vectors(
            Vector::new(1.0e11, 0.0, 0.0),
            Vector::new(-1.0e3, 0.0, 0.0),
            SUN,
            G,
        );
        assert_eq!(elements.inclination, 0.0);
        assert_eq!(elements.ascending_node_longitude, 0.0);
        assert_eq!(elements.argument_of_periapsis, 0.0);
        assert!(elements.eccentricity.is_finite());
    }

    #[test]
    fn test_node_quadrant_correction() {
        let mu = G * SUN;
        let r = 1.0e11;
        let speed = (mu / r).sqrt();
        // Descending through the reference plane at +y puts the node on -y
        let position = Vector::new(0.0, r, 0.0);
        let velocity = Vector::new(-speed * 0.8, 0.0, -speed * 0.6);

        let elements = OrbitalElements::from_state_vectors(position, velocity, SUN, G);
        let h = position.cross(velocity);
        assert!(Vector::Z.cross(h).y < 0.0);
        assert!((elements.ascending_node_longitude - 1.5 * std::f64::consts::PI).abs() < 1e-12);
        assert!((elements.inclination - libm::acos(0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_radial_summary_of_constant_distance() {
        let summary = RadialSummary::from_distances(&[2.0, 2.0, 2.0]).unwrap();
        assert_eq!(summary.mean_distance, 2.0);
        assert_eq!(summary.relative_spread, 0.0);

        assert!(RadialSummary::from_distances(&[]).is_err());
    }

    #[test]
    fn test_radial_summary_spread() {
        let summary = RadialSummary::from_distances(&[1.0, 3.0]).unwrap();
        assert_eq!(summary.mean_distance, 2.0);
        assert_eq!(summary.relative_spread, 0.5);
    }
}
