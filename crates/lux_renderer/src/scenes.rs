//! Built-in test scenes.

use crate::light::AreaLight;
use crate::material::{Bsdf, Lambertian, Spectrum};
use crate::measured::MeasuredBrdf;
use crate::quad::Quad;
use crate::scene::{Scene, SceneBuilder};
use crate::sphere::Sphere;
use log::info;
use lux_core::{BrdfCache, MerlResult};
use lux_math::Vec3;

/// Box width along x, in millimetres.
pub const CORNELL_WIDTH: f32 = 556.0;
/// Box height along y.
pub const CORNELL_HEIGHT: f32 = 548.8;
/// Box depth along z.
pub const CORNELL_DEPTH: f32 = 559.2;

/// Spheres per row in the material grid.
pub const GRID_COLUMNS: usize = 4;
/// Sphere radius in the material grid.
pub const SPHERE_RADIUS: f32 = 70.0;

/// Light strip intensity.
pub const LIGHT_INTENSITY: f32 = 20.0;

/// Measured materials shown by default, one per sphere.
pub const MERL_MODELS: [&str; 16] = [
    "beige-fabric",
    "yellow-matte-plastic",
    "green-plastic",
    "neoprene-rubber",
    "blue-rubber",
    "polyurethane-foam",
    "special-walnut-224",
    "yellow-phenolic",
    "green-metallic-paint",
    "red-metallic-paint",
    "violet-acrylic",
    "grease-covered-steel",
    "aluminium",
    "alum-bronze",
    "two-layer-silver",
    "two-layer-gold",
];

/// Camera position looking into the open side of the box.
pub const CORNELL_EYE: Vec3 = Vec3::new(278.0, 274.4, -548.0);

/// Cornell box with a grid of spheres, one per material.
///
/// Grey diffuse walls, a one-sided light strip under the ceiling and one
/// just above the floor. Spheres fill rows of [`GRID_COLUMNS`] from the
/// bottom left.
pub fn cornell_box(sphere_materials: Vec<Bsdf>, epsilon: f32) -> Scene {
    let mut builder = SceneBuilder::new().with_epsilon(epsilon);
    add_walls(&mut builder);

    let strip_z = CORNELL_DEPTH - 400.0;
    builder
        .add_light(AreaLight::new(
            Quad::centered(Vec3::new(278.0, 548.0, strip_z), -Vec3::Y, 200.0, 556.0),
            Spectrum::ONE,
            LIGHT_INTENSITY,
        ))
        .add_light(AreaLight::new(
            Quad::centered(Vec3::new(278.0, 0.1, strip_z), Vec3::Y, 200.0, 556.0),
            Spectrum::ONE,
            LIGHT_INTENSITY,
        ));

    let spacing = 550.0 / GRID_COLUMNS as f32;
    for (i, bsdf) in sphere_materials.into_iter().enumerate() {
        let column = (i % GRID_COLUMNS) as f32;
        let row = (i / GRID_COLUMNS) as f32;
        let center = Vec3::new((column + 0.5) * spacing, (row + 0.5) * spacing, 400.0);
        builder.add_shape(Sphere::new(center, SPHERE_RADIUS), bsdf);
    }

    builder.build()
}

fn add_walls(builder: &mut SceneBuilder) {
    let (w, h, d) = (CORNELL_WIDTH, CORNELL_HEIGHT, CORNELL_DEPTH);
    let grey = || Bsdf::new().with(Lambertian::new(Spectrum::splat(0.5)));

    builder
        // floor
        .add_shape(Quad::centered(Vec3::new(w / 2.0, 0.0, d / 2.0), Vec3::Y, d, w), grey())
        // ceiling
        .add_shape(Quad::centered(Vec3::new(w / 2.0, h, d / 2.0), -Vec3::Y, d, w), grey())
        // back
        .add_shape(Quad::centered(Vec3::new(w / 2.0, h / 2.0, d), -Vec3::Z, w, h), grey())
        // right
        .add_shape(Quad::centered(Vec3::new(w, h / 2.0, d / 2.0), -Vec3::X, h, d), grey())
        // left
        .add_shape(Quad::centered(Vec3::new(0.0, h / 2.0, d / 2.0), Vec3::X, h, d), grey());
}

/// Diffuse sphere materials with a spread of albedos.
pub fn diffuse_materials(count: usize) -> Vec<Bsdf> {
    (0..count)
        .map(|i| {
            let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.5 };
            let albedo = Spectrum::new(0.8 - 0.6 * t, 0.3 + 0.4 * t, 0.2 + 0.6 * t);
            Bsdf::new().with(Lambertian::new(albedo))
        })
        .collect()
}

/// Load one measured material per name through `cache`.
///
/// Fails on the first table that cannot be read.
pub fn measured_materials(cache: &mut BrdfCache, names: &[impl AsRef<str>]) -> MerlResult<Vec<Bsdf>> {
    let mut materials = Vec::with_capacity(names.len());
    for name in names {
        let table = cache.load(name.as_ref())?;
        materials.push(Bsdf::new().with(MeasuredBrdf::new(table)));
    }
    info!("Loaded {} measured materials ({} unique tables)", materials.len(), cache.len());
    Ok(materials)
}
