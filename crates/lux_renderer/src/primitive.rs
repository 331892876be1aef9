//! Scene primitives: reflective shapes and area lights.

use crate::light::AreaLight;
use crate::material::Bsdf;
use crate::shape::{Shape, ShapeHit};
use lux_math::{Interval, Ray};

/// A shape with the reflectance terms that describe its surface.
pub struct ShapePrimitive {
    shape: Box<dyn Shape>,
    bsdf: Bsdf,
}

impl ShapePrimitive {
    pub fn new(shape: impl Shape + 'static, bsdf: Bsdf) -> Self {
        Self {
            shape: Box::new(shape),
            bsdf,
        }
    }

    pub fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }

    pub fn bsdf(&self) -> &Bsdf {
        &self.bsdf
    }
}

/// Anything the scene can intersect.
pub enum Primitive {
    Shape(ShapePrimitive),
    Light(AreaLight),
}

impl Primitive {
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<ShapeHit> {
        match self {
            Primitive::Shape(p) => p.shape.hit(ray, ray_t),
            Primitive::Light(light) => light.hit(ray, ray_t),
        }
    }

    /// Reflectance terms, or `None` for lights.
    pub fn bsdf(&self) -> Option<&Bsdf> {
        match self {
            Primitive::Shape(p) => Some(&p.bsdf),
            Primitive::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&AreaLight> {
        match self {
            Primitive::Light(light) => Some(light),
            Primitive::Shape(_) => None,
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, Primitive::Light(_))
    }
}
