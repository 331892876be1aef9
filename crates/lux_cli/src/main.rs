//! Render the measured-material Cornell box to a PNG.
//!
//! Usage: lux [--config job.json] [--out lux.png] [--brdf-dir BRDF]
//!            [--brdf name]... [--diffuse] [--lenient]
//!            [--spp N] [--seed N] [--width N] [--height N]

mod config;

use anyhow::{Context, Result};
use config::JobConfig;
use lux_core::BrdfCache;
use lux_renderer::scenes::{cornell_box, diffuse_materials, measured_materials};
use lux_renderer::{render, ImageBuffer, Scene};
use std::path::Path;

fn build_scene(config: &JobConfig) -> Result<Scene> {
    let settings = &config.scene;
    let materials = if settings.diffuse {
        diffuse_materials(settings.brdfs.len().max(1))
    } else {
        let mut cache = BrdfCache::with_base_dir(&settings.brdf_dir)
            .with_dimension_check(settings.dimension_check());
        measured_materials(&mut cache, settings.brdfs.as_slice()).with_context(|| {
            format!("Failed to load measured materials from {}", settings.brdf_dir.display())
        })?
    };

    Ok(cornell_box(materials, settings.epsilon))
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Image buffer size mismatch")?;
    rgba.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = JobConfig::from_args(&args)?;

    log::info!("Starting Lux");
    let scene = build_scene(&config)?;
    let camera = config.camera.build();

    let image = render(&camera, &scene, &config.render);
    save_png(&image, &config.output)?;
    log::info!("Saved {}", config.output.display());

    Ok(())
}
