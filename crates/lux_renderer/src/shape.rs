//! Shape trait for ray intersection and surface sampling.

use lux_math::{Interval, Ray, Vec2, Vec3};

/// Geometry of a ray-shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Outward surface normal (unit length)
    pub normal: Vec3,
}

/// A point sampled on a shape's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSample {
    pub p: Vec3,
    /// Outward surface normal at `p`
    pub normal: Vec3,
    /// Density of `p`, in area measure for [`Shape::sample`] and in solid
    /// angle at the reference point for [`Shape::sample_from`]
    pub pdf: f32,
}

/// Trait for surfaces that can be hit by rays and sampled by area.
pub trait Shape: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit>;

    /// Total surface area.
    fn area(&self) -> f32;

    /// Uniformly sample a point by area. `pdf` is `1 / area`.
    fn sample(&self, u: Vec2) -> ShapeSample;

    /// Sample a point as seen from `reference`, with the pdf converted to
    /// solid angle at `reference`.
    ///
    /// The default converts a uniform area sample with `dist² / |cos θ_light|`.
    fn sample_from(&self, reference: Vec3, u: Vec2) -> ShapeSample {
        area_to_solid_angle(self.sample(u), reference)
    }

    /// Solid-angle density of [`Shape::sample_from`] producing direction `wi`.
    fn pdf_from(&self, reference: Vec3, wi: Vec3) -> f32 {
        area_pdf_from(self, reference, wi)
    }
}

/// Solid-angle density at `reference` of area-sampling `shape` along `wi`.
pub(crate) fn area_pdf_from<S: Shape + ?Sized>(shape: &S, reference: Vec3, wi: Vec3) -> f32 {
    let ray = Ray::new(reference, wi);
    let Some(hit) = shape.hit(&ray, Interval::from_min(0.0)) else {
        return 0.0;
    };

    let cos_light = hit.normal.dot(-wi.normalize()).abs();
    if cos_light == 0.0 {
        return 0.0;
    }
    (hit.p - reference).length_squared() / (cos_light * shape.area())
}

/// Convert an area-measure sample to solid angle at `reference`.
pub(crate) fn area_to_solid_angle(mut sample: ShapeSample, reference: Vec3) -> ShapeSample {
    let to_light = sample.p - reference;
    let dist_sq = to_light.length_squared();
    if dist_sq == 0.0 {
        sample.pdf = 0.0;
        return sample;
    }

    let cos_light = sample.normal.dot(-to_light / dist_sq.sqrt()).abs();
    sample.pdf = if cos_light == 0.0 {
        0.0
    } else {
        sample.pdf * dist_sq / cos_light
    };
    sample
}
