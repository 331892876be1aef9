//! Example: Load a MERL table and print a few reflectance values.
//!
//! Run with: cargo run --example inspect_merl -- BRDF/blue-rubber.binary

use std::env;

use lux_core::{DimensionCheck, MerlTable};
use lux_math::Vec3;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_merl <path-to-binary> [--lenient]");
        println!("\nExamples:");
        println!("  cargo run --example inspect_merl -- BRDF/blue-rubber.binary");
        println!("  cargo run --example inspect_merl -- BRDF/alum-bronze.binary --lenient");
        return;
    }

    let path = &args[1];
    let check = if args.iter().any(|a| a == "--lenient") {
        DimensionCheck::Warn
    } else {
        DimensionCheck::Reject
    };

    println!("Loading MERL table: {}", path);

    match MerlTable::open(path, check) {
        Ok(table) => {
            println!("\n=== {} ===", path);
            println!("Dimensions: {:?}", table.dims());
            println!("Size: {:.1} MB", table.size_bytes() as f32 / (1024.0 * 1024.0));

            println!("\n--- In-plane slice (wo fixed at 30°) ---");
            let theta_o = 30f32.to_radians();
            let wo = Vec3::new(theta_o.sin(), 0.0, theta_o.cos());
            for deg in (-80..=80).step_by(20) {
                let theta_i = (deg as f32).to_radians();
                let wi = Vec3::new(theta_i.sin(), 0.0, theta_i.cos());
                let rgb = table.lookup(wo, wi);
                println!("  wi {:>4}°: ({:.4}, {:.4}, {:.4})", deg, rgb.x, rgb.y, rgb.z);
            }
        }
        Err(e) => {
            eprintln!("Error loading MERL table: {}", e);
        }
    }
}
