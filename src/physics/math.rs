use crate::resources::SharedRng;
use rand::Rng;

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 3D vector type for positions, velocities, and accelerations
pub type Vector = bevy::math::DVec3;

pub const TAU: Scalar = std::f64::consts::TAU;

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut SharedRng) -> Vector {
    let theta = rng.random_range(0.0..=TAU);
    let phi = libm::acos(rng.random_range(-1.0..=1.0));

    Vector::new(
        libm::sin(phi) * libm::cos(theta),
        libm::sin(phi) * libm::sin(theta),
        libm::cos(phi),
    )
}

/// `acos` with its argument clamped into [-1, 1].
///
/// Ratios like `h_z / |h|` can land a few ulps outside the domain for nearly
/// aligned vectors, which would otherwise produce NaN.
#[inline]
pub fn clamped_acos(cosine: Scalar) -> Scalar {
    libm::acos(cosine.clamp(-1.0, 1.0))
}

/// |a - b| / |b|, falling back to the absolute difference when `b` is zero.
#[inline]
pub fn relative_difference(a: Scalar, b: Scalar) -> Scalar {
    if b == 0.0 {
        (a - b).abs()
    } else {
        ((a - b) / b).abs()
    }
}

#[inline]
pub fn is_finite_vector(vector: Vector) -> bool {
    vector.x.is_finite() && vector.y.is_finite() && vector.z.is_finite()
}
