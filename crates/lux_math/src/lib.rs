// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod frame;
mod interval;
mod ray;
pub mod sampling;

pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;
