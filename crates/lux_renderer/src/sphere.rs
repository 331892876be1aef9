//! Sphere primitive for ray tracing.

use crate::shape::{area_pdf_from, area_to_solid_angle, Shape, ShapeHit, ShapeSample};
use lux_math::sampling::{uniform_cone_pdf, uniform_sample_cone, uniform_sample_sphere};
use lux_math::{Frame, Interval, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Cosine of the half-angle the sphere subtends from `reference`,
    /// or `None` when `reference` is inside.
    fn cone_cos_max(&self, reference: Vec3) -> Option<f32> {
        let dist_sq = (self.center - reference).length_squared();
        let r_sq = self.radius * self.radius;
        if dist_sq <= r_sq {
            return None;
        }
        let sin_sq_max = r_sq / dist_sq;
        Some((1.0 - sin_sq_max).max(0.0).sqrt())
    }
}

impl Shape for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        Some(ShapeHit {
            t: root,
            p,
            normal: (p - self.center) / self.radius,
        })
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn sample(&self, u: Vec2) -> ShapeSample {
        let normal = uniform_sample_sphere(u);
        ShapeSample {
            p: self.center + self.radius * normal,
            normal,
            pdf: 1.0 / self.area(),
        }
    }

    /// Samples the cone of directions the sphere subtends, so no samples are
    /// wasted on the far side.
    fn sample_from(&self, reference: Vec3, u: Vec2) -> ShapeSample {
        let Some(cos_max) = self.cone_cos_max(reference) else {
            // Inside the sphere every point is visible; fall back to area sampling
            return area_to_solid_angle(self.sample(u), reference);
        };

        let frame = Frame::from_normal((self.center - reference).normalize());
        let dir = frame.to_world(uniform_sample_cone(u, cos_max));

        let ray = Ray::new(reference, dir);
        let p = match self.hit(&ray, Interval::from_min(0.0)) {
            Some(hit) => hit.p,
            // Grazing directions can slip past the silhouette numerically;
            // snap to the closest point on the sphere instead
            None => {
                let closest = reference + dir * dir.dot(self.center - reference);
                self.center + (closest - self.center).normalize_or_zero() * self.radius
            }
        };

        ShapeSample {
            p,
            normal: (p - self.center) / self.radius,
            pdf: uniform_cone_pdf(cos_max),
        }
    }

    fn pdf_from(&self, reference: Vec3, wi: Vec3) -> f32 {
        let Some(cos_max) = self.cone_cos_max(reference) else {
            return area_pdf_from(self, reference, wi);
        };

        let to_center = (self.center - reference).normalize();
        if wi.normalize().dot(to_center) < cos_max {
            return 0.0;
        }
        uniform_cone_pdf(cos_max)
    }
}
