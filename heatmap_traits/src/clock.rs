use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Time source for the refresh loop.
///
/// - now(): monotonic Instant
/// - sleep(): waits between cycles (implementations may simulate)
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let dur = self.now().saturating_duration_since(epoch);
        u64::try_from(dur.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Real clock backed by `std::time::Instant` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Deterministic clock for tests: `sleep` advances time instantly and the
/// number of sleeps is recorded so cadence can be asserted.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug, Default)]
struct ManualState {
    offset: Duration,
    sleeps: u64,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(ManualState::default())),
        }
    }

    /// Advance the clock without counting a sleep.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.offset = s.offset.saturating_add(d);
        }
    }

    /// Total simulated time since creation.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().map(|s| s.offset).unwrap_or(Duration::ZERO)
    }

    /// Number of `sleep` calls observed.
    pub fn sleeps(&self) -> u64 {
        self.state.lock().map(|s| s.sleeps).unwrap_or(0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, d: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.offset = s.offset.saturating_add(d);
            s.sleeps += 1;
        }
    }
}
