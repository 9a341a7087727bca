pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// A producer of raw measurement lines.
///
/// Each poll yields at most one line, or `None` when nothing arrived within
/// `timeout`. Implementations must not block meaningfully longer than the
/// timeout. Transport failures are returned as errors; callers treat them as
/// "nothing this tick".
pub trait LineSource {
    fn poll_line(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Short human-readable name used in logs.
    fn describe(&self) -> &str {
        "source"
    }
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn poll_line(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).poll_line(timeout)
    }

    fn describe(&self) -> &str {
        (**self).describe()
    }
}
