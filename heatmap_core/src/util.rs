//! Small numeric helpers shared across heatmap_core.

use std::time::Duration;

/// Lower bound of the refresh interval (ms).
pub const MIN_REFRESH_MS: u64 = 100;
/// Upper bound of the refresh interval (ms).
pub const MAX_REFRESH_MS: u64 = 2_000;

/// Clamp an intensity into [0, 1]. NaN maps to 0 so a cell never holds it.
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Refresh interval clamped to the supported range.
#[inline]
pub fn refresh_interval(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_handles_edges() {
        assert_eq!(clamp_unit(-0.1), 0.0);
        assert_eq!(clamp_unit(1.1), 1.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(0.42), 0.42);
    }

    #[test]
    fn refresh_interval_is_bounded() {
        assert_eq!(refresh_interval(10), Duration::from_millis(100));
        assert_eq!(refresh_interval(500), Duration::from_millis(500));
        assert_eq!(refresh_interval(60_000), Duration::from_millis(2_000));
    }
}
