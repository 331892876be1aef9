//! Scene container: primitive list, light index and visibility queries.

use crate::interaction::SurfaceInteraction;
use crate::light::AreaLight;
use crate::material::Bsdf;
use crate::primitive::{Primitive, ShapePrimitive};
use crate::shape::Shape;
use log::info;
use lux_math::{Interval, Ray, Vec3};

/// Default self-intersection tolerance.
pub const DEFAULT_EPSILON: f32 = 1e-3;

/// Immutable collection of primitives.
///
/// Built once through [`SceneBuilder`] and then shared read-only by every
/// render thread.
pub struct Scene {
    primitives: Vec<Primitive>,
    /// Indices into `primitives` of the lights, in insertion order
    lights: Vec<usize>,
    epsilon: f32,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    /// Nearest intersection beyond epsilon.
    ///
    /// Linear scan; on equal distances the earlier primitive wins.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction<'_>> {
        let mut closest_so_far = f32::INFINITY;
        let mut nearest = None;

        for primitive in &self.primitives {
            let interval = Interval::new(self.epsilon, closest_so_far);
            if let Some(hit) = primitive.hit(ray, interval) {
                closest_so_far = hit.t;
                nearest = Some((hit, primitive));
            }
        }

        nearest.map(|(hit, primitive)| SurfaceInteraction::new(ray, hit, primitive, self.epsilon))
    }

    /// Whether `p2` is visible from `p1`.
    ///
    /// True when nothing is hit along `p1 → p2`, or when the nearest hit is
    /// `p2` itself.
    pub fn unoccluded(&self, p1: Vec3, p2: Vec3) -> bool {
        let ray = Ray::between(p1, p2);
        match self.intersect(&ray) {
            None => true,
            Some(isect) => (isect.p - p2).length() < self.epsilon,
        }
    }

    /// Light primitives in insertion order.
    pub fn lights(&self) -> impl Iterator<Item = &AreaLight> {
        self.lights
            .iter()
            .filter_map(|&i| self.primitives[i].as_light())
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn light(&self, index: usize) -> Option<&AreaLight> {
        self.lights
            .get(index)
            .and_then(|&i| self.primitives.get(i))
            .and_then(Primitive::as_light)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

/// Accumulates primitives before freezing them into a [`Scene`].
pub struct SceneBuilder {
    primitives: Vec<Primitive>,
    epsilon: f32,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Add a reflective shape.
    pub fn add_shape(&mut self, shape: impl Shape + 'static, bsdf: Bsdf) -> &mut Self {
        self.primitives
            .push(Primitive::Shape(ShapePrimitive::new(shape, bsdf)));
        self
    }

    /// Add an emitter.
    pub fn add_light(&mut self, light: AreaLight) -> &mut Self {
        self.primitives.push(Primitive::Light(light));
        self
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn build(self) -> Scene {
        let lights: Vec<usize> = self
            .primitives
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_light())
            .map(|(i, _)| i)
            .collect();

        info!(
            "Built scene: {} primitives, {} lights, epsilon {}",
            self.primitives.len(),
            lights.len(),
            self.epsilon
        );

        Scene {
            primitives: self.primitives,
            lights,
            epsilon: self.epsilon,
        }
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Spectrum};
    use crate::quad::Quad;
    use crate::sphere::Sphere;

    fn diffuse() -> Bsdf {
        Bsdf::new().with(Lambertian::new(Spectrum::splat(0.5)))
    }

    fn light_scene(with_blocker: bool) -> Scene {
        let mut builder = Scene::builder();
        builder.add_light(AreaLight::new(
            Quad::centered(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 2.0, 2.0),
            Spectrum::ONE,
            1.0,
        ));
        if with_blocker {
            builder.add_shape(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 0.25), diffuse());
        }
        builder.build()
    }

    #[test]
    fn test_intersect_nearest() {
        let mut builder = Scene::builder();
        builder
            .add_shape(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0), diffuse())
            .add_shape(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5), diffuse());
        let scene = builder.build();

        let isect = scene.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).unwrap();
        assert!((isect.t - 1.5).abs() < 1e-5);
        assert!(isect.front_face);
        assert!((isect.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_intersect_miss() {
        let scene = light_scene(false);
        assert!(scene.intersect(&Ray::new(Vec3::ZERO, -Vec3::Y)).is_none());
    }

    #[test]
    fn test_intersect_ignores_hits_within_epsilon() {
        let scene = light_scene(false);
        // Starting on the light surface, the light itself is skipped
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        assert!(scene.intersect(&ray).is_none());
    }

    #[test]
    fn test_light_hit_reports_primitive() {
        let scene = light_scene(false);
        let isect = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::Y)).unwrap();
        assert!(isect.primitive.is_light());
        assert_eq!(isect.le(), Spectrum::ONE);
    }

    #[test]
    fn test_unoccluded_points_on_same_light() {
        let scene = light_scene(false);
        let a = Vec3::new(-0.5, 2.0, 0.3);
        let b = Vec3::new(0.6, 2.0, -0.4);
        assert!(scene.unoccluded(a, b));
    }

    #[test]
    fn test_unoccluded_to_light() {
        let scene = light_scene(false);
        assert!(scene.unoccluded(Vec3::ZERO, Vec3::new(0.1, 2.0, 0.1)));
    }

    #[test]
    fn test_occluded_by_blocker() {
        let scene = light_scene(true);
        assert!(!scene.unoccluded(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)));
        // Around the blocker is still visible
        assert!(scene.unoccluded(Vec3::new(0.8, 0.0, 0.0), Vec3::new(0.8, 2.0, 0.0)));
    }

    #[test]
    fn test_light_index() {
        let mut builder = Scene::builder();
        builder
            .add_shape(Sphere::new(Vec3::ZERO, 1.0), diffuse())
            .add_light(AreaLight::new(
                Quad::centered(Vec3::Y * 3.0, -Vec3::Y, 1.0, 1.0),
                Spectrum::ONE,
                2.0,
            ));
        let scene = builder.with_epsilon(1e-4).build();

        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.lights().count(), 1);
        assert_eq!(scene.light(0).map(|l| l.emission()), Some(Spectrum::splat(2.0)));
        assert!(scene.light(1).is_none());
        assert_eq!(scene.epsilon(), 1e-4);
    }
}
