//! Disk primitive.

use crate::shape::{Shape, ShapeHit, ShapeSample};
use lux_math::sampling::uniform_sample_disk;
use lux_math::{Frame, Interval, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A flat disk facing along `normal`.
pub struct Disk {
    center: Vec3,
    radius: f32,
    frame: Frame,
}

impl Disk {
    pub fn new(center: Vec3, normal: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            frame: Frame::from_normal(normal.normalize()),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.frame.n
    }
}

impl Shape for Disk {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        let n = self.frame.n;
        let denom = n.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = n.dot(self.center - ray.origin()) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        if (p - self.center).length_squared() > self.radius * self.radius {
            return None;
        }

        Some(ShapeHit { t, p, normal: n })
    }

    fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    fn sample(&self, u: Vec2) -> ShapeSample {
        let d = uniform_sample_disk(u) * self.radius;
        ShapeSample {
            p: self.center + self.frame.to_world(Vec3::new(d.x, d.y, 0.0)),
            normal: self.frame.n,
            pdf: 1.0 / self.area(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_hit_and_miss() {
        let disk = Disk::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 1.0);

        let up = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::Y);
        let hit = disk.hit(&up, Interval::from_min(1e-3)).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!((hit.normal + Vec3::Y).length() < 1e-6);

        let outside = Ray::new(Vec3::new(1.5, 0.0, 0.0), Vec3::Y);
        assert!(disk.hit(&outside, Interval::from_min(1e-3)).is_none());
    }

    #[test]
    fn test_disk_samples_within_radius() {
        let disk = Disk::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 0.0), 0.5);
        for (a, b) in [(0.0, 0.0), (1.0, 0.25), (0.5, 0.9)] {
            let s = disk.sample(Vec2::new(a, b));
            let offset = s.p - Vec3::new(1.0, 1.0, 1.0);
            assert!(offset.length() <= 0.5 + 1e-5);
            assert!(offset.dot(disk.normal()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_disk_solid_angle_pdf_consistent() {
        let disk = Disk::new(Vec3::new(0.0, 4.0, 0.0), -Vec3::Y, 1.0);
        let reference = Vec3::new(0.3, 0.0, 0.0);
        let s = disk.sample_from(reference, Vec2::new(0.6, 0.1));
        let pdf = disk.pdf_from(reference, s.p - reference);
        assert!((s.pdf - pdf).abs() / pdf < 1e-3);
    }
}
