//! Lux Core - measured reflectance data.
//!
//! This crate provides:
//!
//! - **MERL tables**: loading of the MERL `.binary` BRDF format and the
//!   half/difference angle lookup into it
//! - **BRDF cache**: name-based resolution under a `BRDF` directory with
//!   shared, read-only tables
//!
//! # Example
//!
//! ```ignore
//! use lux_core::BrdfCache;
//!
//! let mut cache = BrdfCache::new();
//! let table = cache.load("gold-metallic-paint")?;
//! let rgb = table.lookup(wo, wi);
//! ```

pub mod cache;
pub mod merl;

// Re-export commonly used types
pub use cache::{BrdfCache, DEFAULT_BRDF_DIR};
pub use merl::{DimensionCheck, MerlError, MerlResult, MerlTable};
