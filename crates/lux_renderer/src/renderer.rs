//! Image rendering on top of the path integrator.
//!
//! Implements:
//! - Bucket-parallel rendering with per-bucket generators
//! - Gamma correction
//! - Anti-aliasing via jittered multi-sampling

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::integrator::{PathIntegrator, DEFAULT_MAX_BOUNCES, DEFAULT_ROULETTE_AFTER};
use crate::material::Spectrum;
use crate::scene::Scene;
use log::{debug, info};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Hard cap on path length
    pub max_bounces: u32,
    /// Russian roulette applies after this bounce index
    pub roulette_after: u32,
    /// Base seed; each bucket derives its own generator from it
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            max_bounces: DEFAULT_MAX_BOUNCES,
            roulette_after: DEFAULT_ROULETTE_AFTER,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn integrator(&self) -> PathIntegrator {
        PathIntegrator::new(self.max_bounces, self.roulette_after)
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Spectrum) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
///
/// Samples with NaN or infinite channels are dropped but still count
/// toward the average.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    integrator: &PathIntegrator,
    x: u32,
    y: u32,
    samples_per_pixel: u32,
    rng: &mut dyn RngCore,
) -> Spectrum {
    let samples = samples_per_pixel.max(1);
    let mut pixel_color = Spectrum::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, rng);
        let radiance = integrator.li(&ray, scene, rng);
        if radiance.is_finite() {
            pixel_color += radiance;
        }
    }

    pixel_color / samples as f32
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Spectrum>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Spectrum::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Spectrum {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Spectrum) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Render the entire scene to an image buffer.
///
/// Buckets run in parallel; the result is the same for a given seed
/// regardless of thread count.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height;
    let buckets = generate_buckets(width, height, config.bucket_size);
    let integrator = config.integrator();

    info!(
        "Rendering {}x{} @ {} spp in {} buckets",
        width,
        height,
        config.samples_per_pixel,
        buckets.len()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(
                bucket,
                camera,
                scene,
                &integrator,
                config.samples_per_pixel,
                config.seed,
            );
            debug!("Bucket {} done", bucket.index);
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    info!("Rendered in {:.2?}", start.elapsed());
    image
}
