//! Parallelogram primitive.

use crate::shape::{Shape, ShapeHit, ShapeSample};
use lux_math::{Interval, Ray, Vec2, Vec3};

/// A parallelogram spanned by two edges from a corner.
///
/// The outward normal is `normalize(u × v)`, which is also the side a
/// one-sided area light built on this quad emits from.
pub struct Quad {
    corner: Vec3,
    u: Vec3,
    v: Vec3,
    normal: Vec3,
    /// Plane offset: normal · p = d
    d: f32,
    /// Cached n / (n · n) for planar coordinates
    w: Vec3,
    area: f32,
}

impl Quad {
    /// Create a quad from a corner and two edge vectors.
    pub fn new(corner: Vec3, u: Vec3, v: Vec3) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        Self {
            corner,
            u,
            v,
            normal,
            d: normal.dot(corner),
            w: n / n.dot(n),
            area: n.length(),
        }
    }

    /// Create an axis-aligned rectangle centered at `center`, facing `normal`.
    ///
    /// `normal` must be one of the six axis directions.
    pub fn centered(center: Vec3, normal: Vec3, width: f32, height: f32) -> Self {
        // Pick edges so that u × v points along `normal`
        let (u_dir, v_dir) = if normal.x.abs() > 0.5 {
            (Vec3::Y, Vec3::Z * normal.x.signum())
        } else if normal.y.abs() > 0.5 {
            (Vec3::Z, Vec3::X * normal.y.signum())
        } else {
            (Vec3::X, Vec3::Y * normal.z.signum())
        };

        let u = u_dir * width;
        let v = v_dir * height;
        Self::new(center - 0.5 * (u + v), u, v)
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Shape for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let denom = self.normal.dot(ray.direction());

        // Ray is parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        // Planar coordinates of the hit relative to the corner
        let p = ray.at(t);
        let planar = p - self.corner;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        Some(ShapeHit {
            t,
            p,
            normal: self.normal,
        })
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn sample(&self, u: Vec2) -> ShapeSample {
        ShapeSample {
            p: self.corner + u.x * self.u + u.y * self.v,
            normal: self.normal,
            pdf: 1.0 / self.area,
        }
    }
}
