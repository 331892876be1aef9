//! Unidirectional path tracing with next-event estimation.

use crate::light::sample_one_light;
use crate::material::{abs_cos_world, Spectrum};
use crate::scene::Scene;
use lux_math::Ray;
use rand::{Rng, RngCore};

/// Default hard cap on path length.
pub const DEFAULT_MAX_BOUNCES: u32 = 20;

/// Russian roulette starts once the bounce index exceeds this.
pub const DEFAULT_ROULETTE_AFTER: u32 = 3;

/// Estimates incoming radiance along camera rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathIntegrator {
    pub max_bounces: u32,
    pub roulette_after: u32,
}

impl Default for PathIntegrator {
    fn default() -> Self {
        Self {
            max_bounces: DEFAULT_MAX_BOUNCES,
            roulette_after: DEFAULT_ROULETTE_AFTER,
        }
    }
}

impl PathIntegrator {
    pub fn new(max_bounces: u32, roulette_after: u32) -> Self {
        Self {
            max_bounces,
            roulette_after,
        }
    }

    /// Radiance arriving at the ray origin from along the ray.
    ///
    /// Emission is only picked up directly at the first hit; later light
    /// hits are covered by the light sample taken at the previous bounce.
    pub fn li(&self, ray: &Ray, scene: &Scene, rng: &mut dyn RngCore) -> Spectrum {
        let mut radiance = Spectrum::ZERO;
        let mut beta = Spectrum::ONE;
        let mut ray = *ray;

        for bounce in 0..self.max_bounces {
            let Some(isect) = scene.intersect(&ray) else {
                break;
            };

            let Some(bsdf) = isect.primitive.bsdf() else {
                // Lights don't scatter
                if bounce == 0 {
                    radiance += beta * isect.le();
                }
                break;
            };

            let frame = isect.shading_frame();
            radiance += beta * sample_one_light(&isect, &frame, bsdf, scene, rng);

            let Some(sample) = bsdf.sample_f(&frame, isect.wo, rng) else {
                break;
            };
            if sample.pdf == 0.0 || sample.f == Spectrum::ZERO {
                break;
            }

            if !sample.specular {
                beta *= sample.f * abs_cos_world(&frame, sample.wi) / sample.pdf;
            }
            ray = isect.spawn_ray(sample.wi);

            if bounce > self.roulette_after {
                match russian_roulette(beta, rng.gen()) {
                    Some(survivor) => beta = survivor,
                    None => break,
                }
            }
        }

        radiance
    }
}

/// Survival weight `1 - q` for throughput `beta`, where `q = 1 - max(beta)`.
///
/// Not clamped: above 1 the path always survives and is still divided by it.
#[inline]
pub fn survival_probability(beta: Spectrum) -> f32 {
    beta.max_element()
}

/// Russian roulette on throughput `beta` with uniform draw `u`.
///
/// Terminates when `u < q` with `q = 1 - max(beta)`, otherwise returns
/// `beta / (1 - q)`.
pub fn russian_roulette(beta: Spectrum, u: f32) -> Option<Spectrum> {
    let survival = survival_probability(beta);
    let q = 1.0 - survival;
    if survival <= 0.0 || u < q {
        return None;
    }
    Some(beta / survival)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::AreaLight;
    use crate::material::{Bsdf, BxdfSample, Bxdf, Lambertian};
    use crate::quad::Quad;
    use crate::sphere::Sphere;
    use lux_math::{Vec2, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn emissive_quad_scene() -> Scene {
        let mut builder = Scene::builder();
        builder.add_light(AreaLight::new(
            Quad::centered(Vec3::new(0.0, 0.0, -3.0), Vec3::Z, 2.0, 2.0),
            Spectrum::new(1.0, 0.8, 0.6),
            5.0,
        ));
        builder.build()
    }

    #[test]
    fn test_direct_light_hit_returns_emission() {
        let scene = emissive_quad_scene();
        let integrator = PathIntegrator::default();
        let mut rng = StdRng::seed_from_u64(42);

        let l = integrator.li(&Ray::new(Vec3::ZERO, -Vec3::Z), &scene, &mut rng);
        assert_eq!(l, scene.light(0).unwrap().emission());
        assert!((l - Spectrum::new(5.0, 4.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_back_of_one_sided_light_is_dark() {
        let scene = emissive_quad_scene();
        let integrator = PathIntegrator::default();
        let mut rng = StdRng::seed_from_u64(42);

        let l = integrator.li(&Ray::new(Vec3::new(0.0, 0.0, -6.0), Vec3::Z), &scene, &mut rng);
        assert_eq!(l, Spectrum::ZERO);
    }

    #[test]
    fn test_miss_returns_zero() {
        let scene = emissive_quad_scene();
        let integrator = PathIntegrator::default();
        let mut rng = StdRng::seed_from_u64(42);

        let l = integrator.li(&Ray::new(Vec3::ZERO, Vec3::Z), &scene, &mut rng);
        assert_eq!(l, Spectrum::ZERO);
    }

    #[test]
    fn test_empty_scene_returns_zero() {
        let scene = Scene::builder().build();
        let mut rng = StdRng::seed_from_u64(0);
        let l = PathIntegrator::default().li(&Ray::new(Vec3::ZERO, Vec3::X), &scene, &mut rng);
        assert_eq!(l, Spectrum::ZERO);
    }

    #[test]
    fn test_diffuse_floor_under_light_is_lit() {
        let mut builder = Scene::builder();
        builder
            .add_light(AreaLight::new(
                Quad::centered(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 1.0, 1.0),
                Spectrum::ONE,
                10.0,
            ))
            .add_shape(
                Quad::centered(Vec3::ZERO, Vec3::Y, 10.0, 10.0),
                Bsdf::new().with(Lambertian::new(Spectrum::splat(0.5))),
            );
        let scene = builder.build();
        let integrator = PathIntegrator::default();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0).normalize());
        let mut sum = Spectrum::ZERO;
        for _ in 0..256 {
            let l = integrator.li(&ray, &scene, &mut rng);
            assert!(l.is_finite());
            assert!(l.min_element() >= 0.0);
            sum += l;
        }
        let mean = sum / 256.0;
        assert!(mean.x > 0.0);
        // Grey albedo keeps channels equal
        assert!((mean.x - mean.y).abs() < 1e-4 && (mean.y - mean.z).abs() < 1e-4);
    }

    #[test]
    fn test_blocked_light_contributes_nothing() {
        let mut builder = Scene::builder();
        builder
            .add_light(AreaLight::new(
                Quad::centered(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 1.0, 1.0),
                Spectrum::ONE,
                10.0,
            ))
            // Closed sphere around the camera: nothing gets in
            .add_shape(
                Sphere::new(Vec3::ZERO, 1.0),
                Bsdf::new().with(Lambertian::new(Spectrum::splat(0.5))),
            );
        let scene = builder.build();
        let integrator = PathIntegrator::default();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..32 {
            let l = integrator.li(&Ray::new(Vec3::ZERO, Vec3::X), &scene, &mut rng);
            assert_eq!(l, Spectrum::ZERO);
        }
    }

    #[test]
    fn test_half_throughput_survives_half_the_time() {
        let beta = Spectrum::splat(0.5);
        assert_eq!(survival_probability(beta), 0.5);

        let mut rng = StdRng::seed_from_u64(42);
        let trials = 100_000;
        let mut terminated = 0;
        let mut expected = Spectrum::ZERO;
        for _ in 0..trials {
            match russian_roulette(beta, rng.gen()) {
                Some(survivor) => {
                    assert_eq!(survivor, Spectrum::ONE);
                    expected += survivor;
                }
                None => terminated += 1,
            }
        }

        let frequency = terminated as f32 / trials as f32;
        assert!((frequency - 0.5).abs() < 0.01, "termination frequency {}", frequency);
        // Survivors reweighted so the mean equals the pre-roulette throughput
        let mean = expected / trials as f32;
        assert!((mean - beta).length() < 0.02);
    }

    #[test]
    fn test_bright_throughput_is_normalized() {
        let beta = Spectrum::new(1.5, 0.2, 0.1);
        assert_eq!(survival_probability(beta), 1.5);

        // q is negative, so even u = 0 survives, scaled down by max(beta)
        let survivor = russian_roulette(beta, 0.0).unwrap();
        assert!((survivor - Spectrum::new(1.0, 0.2 / 1.5, 0.1 / 1.5)).length() < 1e-6);
        assert_eq!(russian_roulette(Spectrum::ZERO, 0.0), None);
    }

    /// Halves throughput every bounce by scattering straight along the normal.
    struct HalvingBxdf {
        samples: Arc<AtomicUsize>,
    }

    impl Bxdf for HalvingBxdf {
        fn f(&self, _wo: Vec3, _wi: Vec3) -> Spectrum {
            Spectrum::splat(0.5)
        }

        fn sample_f(&self, _wo: Vec3, _u: Vec2) -> BxdfSample {
            self.samples.fetch_add(1, Ordering::SeqCst);
            BxdfSample {
                f: Spectrum::splat(0.5),
                wi: Vec3::Z,
                pdf: 1.0,
                specular: false,
            }
        }

        fn pdf(&self, _wo: Vec3, _wi: Vec3) -> f32 {
            1.0
        }
    }

    /// Every draw is zero, so any roulette with q > 0 terminates.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_roulette_waits_until_after_bounce_three() {
        let samples = Arc::new(AtomicUsize::new(0));
        let mut builder = Scene::builder();
        builder.add_shape(
            Sphere::new(Vec3::ZERO, 1.0),
            Bsdf::new().with(HalvingBxdf {
                samples: Arc::clone(&samples),
            }),
        );
        let scene = builder.build();

        let l = PathIntegrator::default().li(&Ray::new(Vec3::ZERO, Vec3::X), &scene, &mut ZeroRng);
        assert_eq!(l, Spectrum::ZERO);
        // Bounces 0..=3 always continue; the first roulette at bounce 4 ends the path
        assert_eq!(samples.load(Ordering::SeqCst), DEFAULT_ROULETTE_AFTER as usize + 2);
    }

    #[test]
    fn test_max_bounces_caps_path_without_roulette() {
        let samples = Arc::new(AtomicUsize::new(0));
        let mut builder = Scene::builder();
        builder.add_shape(
            Sphere::new(Vec3::ZERO, 1.0),
            Bsdf::new().with(HalvingBxdf {
                samples: Arc::clone(&samples),
            }),
        );
        let scene = builder.build();

        let integrator = PathIntegrator::new(6, 10);
        integrator.li(&Ray::new(Vec3::ZERO, Vec3::X), &scene, &mut ZeroRng);
        assert_eq!(samples.load(Ordering::SeqCst), 6);
    }
}
