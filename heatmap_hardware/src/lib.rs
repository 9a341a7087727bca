//! Measurement sources for the heatmap dashboard.
//!
//! Every source implements `heatmap_traits::LineSource` and yields at most one
//! raw line per poll:
//! - `SimulatedSource`: random `x,y,v` lines for running without hardware
//! - `PushSource`: lines pushed by an external producer (stdin, FIFO, file)
//! - `SerialSource` (feature `hardware`): polled serial port, opened per poll
pub mod error;
pub mod push;
#[cfg(feature = "hardware")]
pub mod serial;
pub mod util;

pub use push::PushSource;
#[cfg(feature = "hardware")]
pub use serial::SerialSource;

use heatmap_traits::LineSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random generator standing in for a sensor feed.
///
/// Emits `"{x},{y},{v}"` with probability `emit_probability` per poll,
/// `x, y` uniform in `0..extent` and `v` uniform in `[0, 1)`.
pub struct SimulatedSource {
    rng: StdRng,
    extent: usize,
    emit_probability: f64,
}

impl SimulatedSource {
    pub fn new(extent: usize, emit_probability: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), extent, emit_probability)
    }

    /// Reproducible stream for tests and demos.
    pub fn seeded(seed: u64, extent: usize, emit_probability: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), extent, emit_probability)
    }

    fn with_rng(rng: StdRng, extent: usize, emit_probability: f64) -> Self {
        let emit_probability = if emit_probability.is_finite() {
            emit_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        SimulatedSource {
            rng,
            extent: extent.max(1),
            emit_probability,
        }
    }
}

impl LineSource for SimulatedSource {
    fn poll_line(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        if !self.rng.gen_bool(self.emit_probability) {
            return Ok(None);
        }
        let x = self.rng.gen_range(0..self.extent);
        let y = self.rng.gen_range(0..self.extent);
        let v: f64 = self.rng.r#gen();
        tracing::trace!(x, y, v, "simulated sample");
        Ok(Some(format!("{x},{y},{v}")))
    }

    fn describe(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn simulated_always_emits_with_probability_one() {
        let mut src = SimulatedSource::seeded(7, 10, 1.0);
        for _ in 0..50 {
            let line = src.poll_line(Duration::ZERO).unwrap().expect("line");
            let parts: Vec<&str> = line.split(',').collect();
            assert_eq!(parts.len(), 3);
            let x: usize = parts[0].parse().unwrap();
            let y: usize = parts[1].parse().unwrap();
            let v: f64 = parts[2].parse().unwrap();
            assert!(x < 10 && y < 10);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn simulated_never_emits_with_probability_zero() {
        let mut src = SimulatedSource::seeded(7, 10, 0.0);
        for _ in 0..50 {
            assert!(src.poll_line(Duration::ZERO).unwrap().is_none());
        }
    }

    #[test]
    fn simulated_seed_is_reproducible() {
        let mut a = SimulatedSource::seeded(42, 10, 0.5);
        let mut b = SimulatedSource::seeded(42, 10, 0.5);
        for _ in 0..20 {
            assert_eq!(
                a.poll_line(Duration::ZERO).unwrap(),
                b.poll_line(Duration::ZERO).unwrap()
            );
        }
    }

    #[test]
    fn simulated_sanitizes_probability() {
        let mut src = SimulatedSource::seeded(1, 0, f64::NAN);
        assert!(src.poll_line(Duration::ZERO).unwrap().is_none());
        let mut src = SimulatedSource::seeded(1, 0, 3.0);
        assert_eq!(
            src.poll_line(Duration::ZERO).unwrap().as_deref().map(|l| &l[..4]),
            Some("0,0,")
        );
    }
}
