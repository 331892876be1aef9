//! Measured isotropic reflectance backed by a MERL table.

use crate::material::{Bxdf, BxdfSample, Spectrum};
use lux_core::MerlTable;
use lux_math::sampling::{cosine_sample_hemisphere, UNIFORM_SPHERE_PDF};
use lux_math::{Vec2, Vec3};
use std::sync::Arc;

/// Reflectance looked up from a tabulated MERL measurement.
///
/// Sampling is cosine-weighted and does not follow the table. `pdf` reports
/// the uniform-sphere density `1/(4π)`, which does not match that sampler;
/// estimates weighted with it are scaled by `4|cos θ|`.
#[derive(Clone)]
pub struct MeasuredBrdf {
    table: Arc<MerlTable>,
}

impl MeasuredBrdf {
    pub fn new(table: Arc<MerlTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &MerlTable {
        &self.table
    }
}

impl Bxdf for MeasuredBrdf {
    fn f(&self, wo: Vec3, wi: Vec3) -> Spectrum {
        self.table.lookup(wo, wi)
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

    fn pdf(&self, _wo: Vec3, _wi: Vec3) -> f32 {
        UNIFORM_SPHERE_PDF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::merl::PLANE_SIZE;
    use std::f32::consts::PI;

    fn constant_table(value: f64) -> Arc<MerlTable> {
        Arc::new(MerlTable::from_samples(vec![value; 3 * PLANE_SIZE]))
    }

    #[test]
    fn test_constant_table_lookup() {
        let brdf = MeasuredBrdf::new(constant_table(1500.0));
        let wo = Vec3::new(0.3, -0.2, 0.9).normalize();
        let wi = Vec3::new(-0.5, 0.1, 0.8).normalize();
        let f = brdf.f(wo, wi);
        assert!((f - Vec3::new(1.0, 1.15, 1.66)).length() < 1e-5);
    }

    #[test]
    fn test_negative_entries_clamp_to_zero() {
        let brdf = MeasuredBrdf::new(constant_table(-3.0));
        assert_eq!(brdf.f(Vec3::Z, Vec3::new(0.0, 0.6, 0.8)), Spectrum::ZERO);
    }

    #[test]
    fn test_sample_is_cosine_weighted_with_constant_pdf() {
        let brdf = MeasuredBrdf::new(constant_table(1.0));
        let s = brdf.sample_f(Vec3::Z, Vec2::new(0.4, 0.7));
        assert!(!s.specular);
        assert!(s.wi.z >= 0.0);
        assert!((s.pdf - 1.0 / (4.0 * PI)).abs() < 1e-7);
        assert_eq!(brdf.pdf(Vec3::Z, -Vec3::Z), s.pdf);
    }
}
