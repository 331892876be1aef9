/// A range of ray parameters bounded by `min` and `max`.
///
/// Intersection routines accept a hit only when `t` lies strictly inside
/// the interval, which is how the scene epsilon keeps rays from re-hitting
/// the surface they were spawned on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Everything past `min`, e.g. `Interval::from_min(epsilon)`.
    pub fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Endpoints are excluded
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));

        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_from_min_is_unbounded_above() {
        let interval = Interval::from_min(1e-3);
        assert!(!interval.surrounds(1e-3));
        assert!(interval.surrounds(1e-2));
        assert!(interval.surrounds(1e20));
    }
}
