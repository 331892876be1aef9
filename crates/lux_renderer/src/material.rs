//! Reflectance terms and the BSDF that aggregates them.
//!
//! Every [`Bxdf`] works in the local shading frame, where the surface normal
//! is +Z and `cos θ` is a direction's z component. [`Bsdf`] owns the terms of
//! one surface and moves directions between world space and that frame.

use lux_math::sampling::{abs_cos_theta, cosine_hemisphere_pdf, cosine_sample_hemisphere, same_hemisphere};
use lux_math::{Frame, Vec2, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::FRAC_1_PI;

/// RGB radiance/reflectance triple. Channels are non-negative.
pub type Spectrum = Vec3;

/// Result of importance-sampling a reflectance term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BxdfSample {
    /// Reflectance for the sampled pair
    pub f: Spectrum,
    /// Sampled incident direction
    pub wi: Vec3,
    /// Density of `wi` in solid angle
    pub pdf: f32,
    /// Specular terms fold `|cos θ| / pdf` into `f`
    pub specular: bool,
}

/// A reflectance term: evaluation, importance sampling and density.
pub trait Bxdf: Send + Sync {
    /// Reflectance for the local direction pair.
    fn f(&self, wo: Vec3, wi: Vec3) -> Spectrum;

    /// Sample an incident direction for `wo` from two uniform numbers.
    fn sample_f(&self, wo: Vec3, u: Vec2) -> BxdfSample;

    /// Solid-angle density with which [`Bxdf::sample_f`] produces `wi`.
    fn pdf(&self, wo: Vec3, wi: Vec3) -> f32;
}

/// Lambertian (ideal diffuse) reflection.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Spectrum,
}

impl Lambertian {
    /// Create a new Lambertian term with the given albedo.
    pub fn new(albedo: Spectrum) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Spectrum {
        self.albedo
    }
}

impl Bxdf for Lambertian {
    fn f(&self, _wo: Vec3, _wi: Vec3) -> Spectrum {
        self.albedo * FRAC_1_PI
    }

    fn sample_f(&self, wo: Vec3, u: Vec2) -> BxdfSample {
        let wi = cosine_sample_hemisphere(u);
        BxdfSample {
            f: self.f(wo, wi),
            wi,
            pdf: self.pdf(wo, wi),
            specular: false,
        }
    }

    fn pdf(&self, _wo: Vec3, wi: Vec3) -> f32 {
        cosine_hemisphere_pdf(wi)
    }
}

/// World-space result of sampling a [`Bsdf`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    pub f: Spectrum,
    /// Sampled incident direction in world space
    pub wi: Vec3,
    pub pdf: f32,
    pub specular: bool,
}

/// Ordered reflectance terms of one surface.
///
/// A single term is used as-is. Several terms combine the usual way: the
/// sampled term is chosen uniformly, `f` sums every term and the pdf is the
/// average of the term densities.
#[derive(Default)]
pub struct Bsdf {
    terms: Vec<Box<dyn Bxdf>>,
}

impl Bsdf {
    /// Create a new empty BSDF.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to append a term.
    pub fn with(mut self, term: impl Bxdf + 'static) -> Self {
        self.add(term);
        self
    }

    /// Append a term.
    pub fn add(&mut self, term: impl Bxdf + 'static) {
        self.terms.push(Box::new(term));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Reflectance for a world-space direction pair.
    ///
    /// All terms are reflective, so directions on opposite sides of the
    /// surface get zero.
    pub fn f(&self, frame: &Frame, wo: Vec3, wi: Vec3) -> Spectrum {
        let wo = frame.to_local(wo);
        let wi = frame.to_local(wi);
        if !same_hemisphere(wo, wi) {
            return Spectrum::ZERO;
        }
        self.terms.iter().map(|t| t.f(wo, wi)).sum()
    }

    /// Importance-sample an incident direction. `None` for an empty BSDF.
    pub fn sample_f(&self, frame: &Frame, wo: Vec3, rng: &mut dyn RngCore) -> Option<BsdfSample> {
        if self.terms.is_empty() {
            return None;
        }

        let wo_local = frame.to_local(wo);
        let index = if self.terms.len() == 1 {
            0
        } else {
            rng.gen_range(0..self.terms.len())
        };
        let u = Vec2::new(rng.gen(), rng.gen());
        let sample = self.terms[index].sample_f(wo_local, u);

        let (f, pdf) = if self.terms.len() == 1 || sample.specular {
            (sample.f, sample.pdf)
        } else {
            let f = self.terms.iter().map(|t| t.f(wo_local, sample.wi)).sum();
            let pdf = self.terms.iter().map(|t| t.pdf(wo_local, sample.wi)).sum::<f32>()
                / self.terms.len() as f32;
            (f, pdf)
        };

        Some(BsdfSample {
            f,
            wi: frame.to_world(sample.wi),
            pdf,
            specular: sample.specular,
        })
    }

    /// Density of [`Bsdf::sample_f`] for a world-space direction pair.
    pub fn pdf(&self, frame: &Frame, wo: Vec3, wi: Vec3) -> f32 {
        if self.terms.is_empty() {
            return 0.0;
        }
        let wo = frame.to_local(wo);
        let wi = frame.to_local(wi);
        self.terms.iter().map(|t| t.pdf(wo, wi)).sum::<f32>() / self.terms.len() as f32
    }
}

/// `|cos θ|` of a world direction against the frame normal.
#[inline]
pub fn abs_cos_world(frame: &Frame, w: Vec3) -> f32 {
    abs_cos_theta(frame.to_local(w))
}
