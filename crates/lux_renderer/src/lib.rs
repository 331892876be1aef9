//! Lux Renderer - CPU path tracing with measured materials
//!
//! A unidirectional Monte Carlo path tracer with next-event estimation and
//! Russian roulette, over a small set of analytic shapes. Surfaces use
//! Lambertian or MERL measured reflectance; emitters are area lights.

mod bucket;
mod camera;
mod disk;
mod integrator;
mod interaction;
mod light;
mod material;
mod measured;
mod primitive;
mod quad;
mod renderer;
mod scene;
pub mod scenes;
mod shape;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraSettings};
pub use disk::Disk;
pub use integrator::{russian_roulette, survival_probability, PathIntegrator};
pub use interaction::SurfaceInteraction;
pub use light::{sample_one_light, AreaLight, LightSample};
pub use material::{Bsdf, BsdfSample, Bxdf, BxdfSample, Lambertian, Spectrum};
pub use measured::MeasuredBrdf;
pub use primitive::{Primitive, ShapePrimitive};
pub use quad::Quad;
pub use renderer::{color_to_rgba, linear_to_gamma, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::{Scene, SceneBuilder, DEFAULT_EPSILON};
pub use shape::{Shape, ShapeHit, ShapeSample};
pub use sphere::Sphere;

/// Re-export common math types from lux_math
pub use lux_math::{Interval, Ray, Vec3};
