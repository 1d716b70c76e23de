//! Popularity ranges in slider (normalized) and log_views (absolute) units.

use serde::{Deserialize, Serialize};

/// Slider range as a fraction of the largest known `log_views`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRange {
    low: f64,
    high: f64,
}

impl NormalizedRange {
    /// The full slider span, `[0, 1]`.
    pub const FULL: NormalizedRange = NormalizedRange { low: 0.0, high: 1.0 };

    /// Build a slider range; both bounds must lie in `[0, 1]` with `low <= high`.
    pub fn new(low: f64, high: f64) -> Result<Self, String> {
        if !low.is_finite() || !high.is_finite() {
            return Err(format!("range bounds must be finite, got [{}, {}]", low, high));
        }
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
            return Err(format!("range bounds must lie in [0, 1], got [{}, {}]", low, high));
        }
        if low > high {
            return Err(format!("range low {} exceeds high {}", low, high));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Scale to absolute units against the collection maximum.
    pub fn scale(&self, max_log_views: f64) -> AbsoluteRange {
        AbsoluteRange {
            low: self.low * max_log_views,
            high: self.high * max_log_views,
        }
    }
}

impl Default for NormalizedRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Popularity range in `log_views` units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteRange {
    pub low: f64,
    pub high: f64,
}

impl AbsoluteRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Closed-interval membership, used for map filtering.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Whether `[left, right]` lies completely inside this range.
    pub fn covers(&self, left: f64, right: f64) -> bool {
        left >= self.low && right <= self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_rejects_out_of_bounds() {
        assert!(NormalizedRange::new(-0.1, 0.5).is_err());
        assert!(NormalizedRange::new(0.0, 1.01).is_err());
        assert!(NormalizedRange::new(0.6, 0.4).is_err());
        assert!(NormalizedRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_normalized_accepts_degenerate_range() {
        let r = NormalizedRange::new(0.3, 0.3).unwrap();
        assert_eq!(r.low(), r.high());
    }

    #[test]
    fn test_scale() {
        let abs = NormalizedRange::new(0.9, 1.0).unwrap().scale(6.0);
        assert!((abs.low - 5.4).abs() < 1e-12);
        assert_eq!(abs.high, 6.0);
    }

    #[test]
    fn test_contains_is_closed() {
        let r = AbsoluteRange::new(2.0, 4.0);
        assert!(r.contains(2.0));
        assert!(r.contains(4.0));
        assert!(!r.contains(4.000001));
    }

    #[test]
    fn test_covers_requires_containment() {
        let r = AbsoluteRange::new(2.0, 4.0);
        assert!(r.covers(2.0, 4.0));
        assert!(r.covers(2.5, 3.0));
        assert!(!r.covers(3.5, 5.0));
        assert!(!r.covers(1.0, 2.5));
    }
}
