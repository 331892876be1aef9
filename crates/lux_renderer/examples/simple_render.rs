//! Simple path tracer example.
//!
//! Renders the Cornell box with diffuse spheres and saves to PPM format.

use lux_renderer::scenes::{cornell_box, diffuse_materials, CORNELL_EYE};
use lux_renderer::{color_to_rgba, render, Camera, ImageBuffer, RenderConfig, Vec3, DEFAULT_EPSILON};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> std::io::Result<()> {
    env_logger::init();

    println!("Lux Path Tracer - Simple Example");
    println!("================================");

    let start = std::time::Instant::now();
    let scene = cornell_box(diffuse_materials(16), DEFAULT_EPSILON);
    println!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::new()
        .with_resolution(256, 256)
        .with_position(CORNELL_EYE, Vec3::new(278.0, 274.4, 0.0), Vec3::Y)
        .with_vfov(40.0);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: 32,
        ..RenderConfig::default()
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width, camera.image_height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render(&camera, &scene, &config);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = color_to_rgba(image.get(x, y));
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    Ok(())
}
