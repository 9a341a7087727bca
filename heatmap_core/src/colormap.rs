//! Fixed "inferno" color scale over [0, 1].
//!
//! Piecewise-linear through anchor colors sampled from the matplotlib original.

/// Anchor points `(t, r, g, b)` with channels in [0, 1].
const INFERNO: [(f64, f64, f64, f64); 9] = [
    (0.000, 0.001, 0.000, 0.014),
    (0.125, 0.116, 0.042, 0.272),
    (0.250, 0.342, 0.062, 0.429),
    (0.375, 0.541, 0.134, 0.415),
    (0.500, 0.736, 0.216, 0.330),
    (0.625, 0.897, 0.336, 0.212),
    (0.750, 0.978, 0.558, 0.035),
    (0.875, 0.964, 0.800, 0.190),
    (1.000, 0.988, 0.998, 0.645),
];

/// Map an intensity to an RGB triple. Out-of-range and NaN inputs are clamped.
pub fn inferno(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mut i = 0;
    while i + 2 < INFERNO.len() && INFERNO[i + 1].0 < t {
        i += 1;
    }
    let (t0, r0, g0, b0) = INFERNO[i];
    let (t1, r1, g1, b1) = INFERNO[i + 1];
    let frac = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
    [
        to_u8(r0 + frac * (r1 - r0)),
        to_u8(g0 + frac * (g1 - g0)),
        to_u8(b0 + frac * (b1 - b0)),
    ]
}

fn to_u8(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luma(c: [u8; 3]) -> f64 {
        0.2126 * f64::from(c[0]) + 0.7152 * f64::from(c[1]) + 0.0722 * f64::from(c[2])
    }

    #[test]
    fn endpoints() {
        assert_eq!(inferno(0.0), [0, 0, 4]);
        assert_eq!(inferno(1.0), [252, 254, 164]);
    }

    #[test]
    fn clamps_inputs() {
        assert_eq!(inferno(-1.0), inferno(0.0));
        assert_eq!(inferno(2.0), inferno(1.0));
        assert_eq!(inferno(f64::NAN), inferno(0.0));
    }

    #[test]
    fn brightness_increases() {
        let mut prev = luma(inferno(0.0));
        for i in 1..=20 {
            let cur = luma(inferno(f64::from(i) / 20.0));
            assert!(cur > prev, "luma not increasing at step {i}");
            prev = cur;
        }
    }
}
