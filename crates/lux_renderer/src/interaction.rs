//! Surface interactions produced by scene intersection.

use crate::primitive::Primitive;
use crate::shape::ShapeHit;
use crate::Spectrum;
use lux_math::{Frame, Ray, Vec3};

/// Record of a ray hitting a primitive.
///
/// Borrowed from the scene for the duration of one estimation step.
#[derive(Clone, Copy)]
pub struct SurfaceInteraction<'a> {
    /// Ray parameter of the hit, in units of the (unnormalized) ray direction
    pub t: f32,
    pub p: Vec3,
    /// Unit shape normal flipped onto the side of `wo`; the shading frame is built on it
    pub normal: Vec3,
    /// False when the shape's outward normal was flipped to face the ray
    pub front_face: bool,
    /// Normalized reverse of the ray direction
    pub wo: Vec3,
    pub primitive: &'a Primitive,
    /// Offset used when spawning rays off this surface
    pub epsilon: f32,
}

impl<'a> SurfaceInteraction<'a> {
    pub fn new(ray: &Ray, hit: ShapeHit, primitive: &'a Primitive, epsilon: f32) -> Self {
        // Outward normal pointing away from the ray means we hit the back side
        let front_face = ray.direction().dot(hit.normal) < 0.0;
        let normal = if front_face { hit.normal } else { -hit.normal };

        Self {
            t: hit.t,
            p: hit.p,
            normal,
            front_face,
            wo: -ray.direction().normalize(),
            primitive,
            epsilon,
        }
    }

    /// The shape's outward normal, regardless of which side was hit.
    #[inline]
    pub fn outward_normal(&self) -> Vec3 {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }

    /// Local shading frame with `z` along the normal facing `wo`.
    pub fn shading_frame(&self) -> Frame {
        Frame::from_normal(self.normal)
    }

    /// Radiance emitted from this point toward `wo`. Zero for non-emitters.
    pub fn le(&self) -> Spectrum {
        match self.primitive.as_light() {
            Some(light) => light.l(self.outward_normal(), self.wo),
            None => Spectrum::ZERO,
        }
    }

    /// Spawn a ray leaving the surface along `wi`, offset to the side `wi` exits on.
    pub fn spawn_ray(&self, wi: Vec3) -> Ray {
        let offset = if wi.dot(self.normal) > 0.0 {
            self.normal * self.epsilon
        } else {
            -self.normal * self.epsilon
        };
        Ray::new(self.p + offset, wi)
    }
}
