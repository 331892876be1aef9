//! Warping functions from the unit square to directions and surfaces.
//!
//! Everything here is pure: callers draw the uniform numbers from their own
//! RNG handle and pass them in, so each worker owns its random stream.

use std::f32::consts::{FRAC_1_PI, PI};

use crate::{Vec2, Vec3};

/// 1 / (4π), the density of a uniformly sampled direction on the sphere.
pub const UNIFORM_SPHERE_PDF: f32 = FRAC_1_PI / 4.0;

#[inline]
pub fn abs_cos_theta(w: Vec3) -> f32 {
    w.z.abs()
}

/// True when both local directions lie on the same side of the surface.
#[inline]
pub fn same_hemisphere(a: Vec3, b: Vec3) -> bool {
    a.z * b.z > 0.0
}

/// Direction from spherical coordinates around +Z.
#[inline]
pub fn spherical_direction(sin_theta: f32, cos_theta: f32, phi: f32) -> Vec3 {
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Cosine-weighted direction on the +Z hemisphere.
///
/// Inverse transform of the density `cos θ / π`: θ = asin(√u.x), φ = 2π·u.y.
pub fn cosine_sample_hemisphere(u: Vec2) -> Vec3 {
    let theta = u.x.sqrt().asin();
    let phi = 2.0 * PI * u.y;
    spherical_direction(theta.sin(), theta.cos(), phi)
}

/// Density of [`cosine_sample_hemisphere`] for a local direction.
#[inline]
pub fn cosine_hemisphere_pdf(w: Vec3) -> f32 {
    abs_cos_theta(w) * FRAC_1_PI
}

/// Uniform point on the unit disk.
pub fn uniform_sample_disk(u: Vec2) -> Vec2 {
    let r = u.x.sqrt();
    let phi = 2.0 * PI * u.y;
    Vec2::new(r * phi.cos(), r * phi.sin())
}

/// Uniform direction on the unit sphere.
pub fn uniform_sample_sphere(u: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniform direction inside the cone of half-angle `acos(cos_theta_max)` around +Z.
pub fn uniform_sample_cone(u: Vec2, cos_theta_max: f32) -> Vec3 {
    let cos_theta = (1.0 - u.x) + u.x * cos_theta_max;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    spherical_direction(sin_theta, cos_theta, phi)
}

#[inline]
pub fn uniform_cone_pdf(cos_theta_max: f32) -> f32 {
    1.0 / (2.0 * PI * (1.0 - cos_theta_max))
}
