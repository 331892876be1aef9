//! Area lights and direct lighting.

use crate::interaction::SurfaceInteraction;
use crate::material::{abs_cos_world, Bsdf, Spectrum};
use crate::scene::Scene;
use crate::shape::{Shape, ShapeHit, ShapeSample};
use lux_math::{Frame, Interval, Ray, Vec2, Vec3};
use rand::{Rng, RngCore};

/// Radiance arriving at a reference point from a sampled light position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Emitted radiance toward the reference point
    pub li: Spectrum,
    /// Unit direction from the reference point to `point`
    pub wi: Vec3,
    /// Solid-angle density at the reference point
    pub pdf: f32,
    pub point: Vec3,
}

impl LightSample {
    /// Zero-contribution sample returned for degenerate cases.
    pub const ZERO: LightSample = LightSample {
        li: Spectrum::ZERO,
        wi: Vec3::ZERO,
        pdf: 0.0,
        point: Vec3::ZERO,
    };
}

/// A shape that emits constant radiance.
pub struct AreaLight {
    shape: Box<dyn Shape>,
    emit: Spectrum,
    two_sided: bool,
}

impl AreaLight {
    /// Create a one-sided light emitting `color * intensity` from the
    /// shape's outward side.
    pub fn new(shape: impl Shape + 'static, color: Spectrum, intensity: f32) -> Self {
        Self {
            shape: Box::new(shape),
            emit: color * intensity,
            two_sided: false,
        }
    }

    pub fn with_two_sided(mut self, two_sided: bool) -> Self {
        self.two_sided = two_sided;
        self
    }

    pub fn emission(&self) -> Spectrum {
        self.emit
    }

    pub fn is_two_sided(&self) -> bool {
        self.two_sided
    }

    pub fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        self.shape.hit(ray, ray_t)
    }

    /// Uniform area sample on the light surface.
    pub fn sample(&self, rng: &mut dyn RngCore) -> ShapeSample {
        self.shape.sample(Vec2::new(rng.gen(), rng.gen()))
    }

    /// Sample incident radiance at `reference`.
    ///
    /// Returns [`LightSample::ZERO`] when the pdf vanishes or the sampled
    /// point is within `epsilon` of `reference`.
    pub fn sample_li(&self, reference: Vec3, epsilon: f32, rng: &mut dyn RngCore) -> LightSample {
        let sample = self
            .shape
            .sample_from(reference, Vec2::new(rng.gen(), rng.gen()));

        let to_light = sample.p - reference;
        if sample.pdf == 0.0 || to_light.length_squared() < epsilon {
            return LightSample::ZERO;
        }

        let wi = to_light.normalize();
        LightSample {
            li: self.l(sample.normal, -wi),
            wi,
            pdf: sample.pdf,
            point: sample.p,
        }
    }

    /// Radiance leaving a point with outward `normal` along `w`.
    pub fn l(&self, normal: Vec3, w: Vec3) -> Spectrum {
        if self.two_sided || normal.dot(w) > 0.0 {
            self.emit
        } else {
            Spectrum::ZERO
        }
    }

    /// Solid-angle density of [`AreaLight::sample_li`] choosing direction `wi`.
    pub fn pdf_li(&self, reference: Vec3, wi: Vec3) -> f32 {
        self.shape.pdf_from(reference, wi)
    }
}

/// Next-event estimate from one uniformly chosen light.
///
/// Accounts for the BSDF value, the cosine at the shading point and
/// visibility. The light choice is compensated by the light count.
pub fn sample_one_light(
    isect: &SurfaceInteraction,
    frame: &Frame,
    bsdf: &Bsdf,
    scene: &Scene,
    rng: &mut dyn RngCore,
) -> Spectrum {
    let count = scene.light_count();
    if count == 0 {
        return Spectrum::ZERO;
    }

    let index = rng.gen_range(0..count);
    let Some(light) = scene.light(index) else {
        return Spectrum::ZERO;
    };

    let ls = light.sample_li(isect.p, scene.epsilon(), rng);
    if ls.pdf == 0.0 || ls.li == Spectrum::ZERO {
        return Spectrum::ZERO;
    }

    let f = bsdf.f(frame, isect.wo, ls.wi) * abs_cos_world(frame, ls.wi);
    if f == Spectrum::ZERO {
        return Spectrum::ZERO;
    }

    let origin = isect.spawn_ray(ls.wi).origin();
    if !scene.unoccluded(origin, ls.point) {
        return Spectrum::ZERO;
    }

    f * ls.li / ls.pdf * count as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quad::Quad;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ceiling_light() -> AreaLight {
        // Faces down toward the origin
        AreaLight::new(
            Quad::centered(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 1.0, 1.0),
            Spectrum::new(1.0, 0.5, 0.25),
            4.0,
        )
    }

    #[test]
    fn test_area_sample_lies_on_light() {
        let light = ceiling_light();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..64 {
            let s = light.sample(&mut rng);
            assert!((s.p.y - 2.0).abs() < 1e-5);
            assert!(s.p.x.abs() <= 0.5 + 1e-5 && s.p.z.abs() <= 0.5 + 1e-5);
            assert!((s.normal - -Vec3::Y).length() < 1e-5);
            // Unit square: area density is 1
            assert!((s.pdf - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_emission_is_color_times_intensity() {
        let light = ceiling_light();
        assert_eq!(light.emission(), Spectrum::new(4.0, 2.0, 1.0));
    }

    #[test]
    fn test_one_sided_emission() {
        let light = ceiling_light();
        let n = -Vec3::Y;
        assert_eq!(light.l(n, -Vec3::Y), light.emission());
        assert_eq!(light.l(n, Vec3::Y), Spectrum::ZERO);

        let two_sided = ceiling_light().with_two_sided(true);
        assert_eq!(two_sided.l(n, Vec3::Y), two_sided.emission());
    }

    #[test]
    fn test_sample_li_points_at_light() {
        let light = ceiling_light();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            let ls = light.sample_li(Vec3::ZERO, 1e-3, &mut rng);
            assert!(ls.pdf > 0.0);
            assert!((ls.point.y - 2.0).abs() < 1e-5);
            assert!((ls.wi - ls.point.normalize()).length() < 1e-5);
            assert_eq!(ls.li, light.emission());
            assert!((ls.pdf - light.pdf_li(Vec3::ZERO, ls.wi)).abs() / ls.pdf < 1e-3);
        }
    }

    #[test]
    fn test_sample_li_from_behind_gets_no_radiance() {
        let light = ceiling_light();
        let mut rng = StdRng::seed_from_u64(1);
        let ls = light.sample_li(Vec3::new(0.0, 4.0, 0.0), 1e-3, &mut rng);
        assert!(ls.pdf > 0.0);
        assert_eq!(ls.li, Spectrum::ZERO);
    }

    #[test]
    fn test_degenerate_sample_is_zero() {
        // A point-sized light collapses every sample onto the reference
        let light = AreaLight::new(
            Quad::new(Vec3::ZERO, Vec3::X * 1e-4, Vec3::Z * 1e-4),
            Spectrum::ONE,
            1.0,
        );
        let mut rng = StdRng::seed_from_u64(5);
        let ls = light.sample_li(Vec3::ZERO, 1e-3, &mut rng);
        assert_eq!(ls, LightSample::ZERO);
    }
}
