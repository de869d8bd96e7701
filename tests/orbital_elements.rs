//! Orbital element extraction against constructed and simulated orbits

use orbitchaos::analysis::orbital_elements::{
    OrbitPair, OrbitalElements, element_series, radial_summary,
};
use orbitchaos::physics::components::{Body, SystemState};
use orbitchaos::physics::forces::NewtonianGravity;
use orbitchaos::physics::math::{Scalar, TAU, Vector};
use orbitchaos::physics::simulation::{RunSettings, simulate};
use orbitchaos::scenario::{EARTH, MOON, SunEarthMoon};

const G: Scalar = 6.67430e-11;
const SUN_MASS: Scalar = 1.989e30;

fn circular_state(radius: Scalar, primary_mass: Scalar) -> (Vector, Vector) {
    let speed = (G * primary_mass / radius).sqrt();
    (Vector::new(radius, 0.0, 0.0), Vector::new(0.0, speed, 0.0))
}

#[test]
fn test_circular_orbit_round_trip() {
    for radius in [3.844e8, 1.496e11, 7.78e11] {
        let (position, velocity) = circular_state(radius, SUN_MASS);
        let elements = OrbitalElements::from_state_vectors(position, velocity, SUN_MASS, G);

        assert!(
            (elements.semi_major_axis - radius).abs() / radius < 1e-10,
            "a = {} for a circular orbit of radius {radius}",
            elements.semi_major_axis
        );
        assert!(elements.eccentricity < 1e-10);
        assert_eq!(elements.inclination, 0.0);
        assert_eq!(elements.ascending_node_longitude, 0.0);
        assert_eq!(elements.argument_of_periapsis, 0.0);
    }
}

#[test]
fn test_polar_orbit_inclination() {
    let radius = 1.0e11;
    let speed = (G * SUN_MASS / radius).sqrt();
    let elements = OrbitalElements::from_state_vectors(
        Vector::new(radius, 0.0, 0.0),
        Vector::new(0.0, 0.0, speed),
        SUN_MASS,
        G,
    );

    assert!((elements.inclination - TAU / 4.0).abs() < 1e-12);
    // h = -y·r·v, so the node points along +x
    assert!(elements.ascending_node_longitude.abs() < 1e-12);
    // Circular but inclined: no periapsis to measure from the node
    assert!(elements.eccentricity < 1e-9);
    assert_eq!(elements.argument_of_periapsis, 0.0);
}

#[test]
fn test_inclined_eccentric_orbit_periapsis_argument() {
    let mu = G * SUN_MASS;
    let periapsis = 1.0e11;
    let eccentricity = 0.3;
    let speed = (mu * (1.0 + eccentricity) / periapsis).sqrt();

    // Periapsis above the reference plane: 30° past the ascending node along +x
    let inclination: Scalar = 0.4;
    let argument: Scalar = TAU / 12.0;
    let in_plane_y = Vector::new(0.0, inclination.cos(), inclination.sin());
    let periapsis_direction = Vector::X * argument.cos() + in_plane_y * argument.sin();
    let velocity_direction = -Vector::X * argument.sin() + in_plane_y * argument.cos();

    let elements = OrbitalElements::from_state_vectors(
        periapsis_direction * periapsis,
        velocity_direction * speed,
        SUN_MASS,
        G,
    );

    assert!((elements.eccentricity - eccentricity).abs() < 1e-9);
    assert!((elements.inclination - inclination).abs() < 1e-9);
    // The node lies on +x; rounding may put it just below 2π instead of at 0
    let node = elements.ascending_node_longitude;
    assert!(node.min(TAU - node) < 1e-9);
    assert!((elements.argument_of_periapsis - argument).abs() < 1e-9);
}

#[test]
fn test_periapsis_below_plane_uses_reflex_angle() {
    let mu = G * SUN_MASS;
    let periapsis = 1.0e11;
    let speed = (mu * 1.2 / periapsis).sqrt();

    let inclination: Scalar = 0.4;
    let argument: Scalar = -TAU / 12.0;
    let in_plane_y = Vector::new(0.0, inclination.cos(), inclination.sin());
    let periapsis_direction = Vector::X * argument.cos() + in_plane_y * argument.sin();
    let velocity_direction = -Vector::X * argument.sin() + in_plane_y * argument.cos();

    let elements = OrbitalElements::from_state_vectors(
        periapsis_direction * periapsis,
        velocity_direction * speed,
        SUN_MASS,
        G,
    );

    assert!((elements.argument_of_periapsis - (TAU + argument)).abs() < 1e-9);
}

#[test]
fn test_two_body_elements_stay_constant_along_simulation() {
    let radius = 1.496e11;
    let (position, velocity) = circular_state(radius, SUN_MASS);
    // Slightly eccentric, light secondary so the primary barely moves
    let state = SystemState::new([
        Body::new(SUN_MASS, Vector::ZERO, Vector::ZERO),
        Body::new(1.0, position, velocity * 1.05),
    ])
    .unwrap();

    let trajectory = simulate(
        state,
        NewtonianGravity::new(G),
        &RunSettings::new(365.0 * 86_400.0, 3_600.0, 5.0 * 86_400.0),
    )
    .unwrap();
    let elements = element_series(&trajectory, OrbitPair::new(1, 0), G).unwrap();

    let first = elements[0];
    assert_eq!(first.time, 0.0);
    for element in &elements {
        assert!(
            (element.semi_major_axis - first.semi_major_axis).abs() / first.semi_major_axis < 1e-5
        );
        assert!((element.eccentricity - first.eccentricity).abs() < 1e-5);
    }
}

#[test]
fn test_scenario_moon_orbits_earth() {
    let scenario = SunEarthMoon::default();
    let trajectory = simulate(
        scenario.system_state().unwrap(),
        NewtonianGravity::new(G),
        &RunSettings::new(60.0 * 86_400.0, 43_200.0, 86_400.0),
    )
    .unwrap();

    let pair = OrbitPair::new(MOON, EARTH);
    let elements = element_series(&trajectory, pair, G).unwrap();
    assert!(elements.iter().all(OrbitalElements::is_bound));

    let summary = radial_summary(&trajectory, pair).unwrap();
    assert!(summary.mean_distance > 3.0e8 && summary.mean_distance < 4.5e8);
    assert!(summary.relative_spread < 0.2);

    // Element extraction rejects a body paired with itself
    assert!(element_series(&trajectory, OrbitPair::new(EARTH, EARTH), G).is_err());
}
