use std::time::Duration;

use heatmap_traits::LineSource;

use crate::error::HwError;
use crate::util::{MAX_LINE_BYTES, read_synced_line};

/// Per-read timeout handed to the port driver; the line deadline is enforced above it.
const READ_SLICE: Duration = Duration::from_millis(10);

/// Polled serial-line reader.
///
/// The port is opened, read for at most one line and closed again on every
/// poll, so an unplugged adapter never leaves a stale handle behind. A fresh
/// handle may join the device mid-line, so the first fragment is dropped and
/// only the next complete line is returned.
pub struct SerialSource {
    port: String,
    baud_rate: u32,
}

impl SerialSource {
    pub fn new(port: &str, baud_rate: u32) -> Self {
        Self {
            port: port.to_string(),
            baud_rate,
        }
    }
}

impl LineSource for SerialSource {
    fn poll_line(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let mut port = serialport::new(self.port.as_str(), self.baud_rate)
            .timeout(READ_SLICE.min(timeout.max(Duration::from_millis(1))))
            .open()
            .map_err(|e| HwError::Serial(format!("open {}: {e}", self.port)))?;
        let line = read_synced_line(&mut port, timeout, MAX_LINE_BYTES)?;
        if let Some(l) = &line {
            tracing::debug!(port = %self.port, line = %l, "serial line");
        }
        Ok(line)
    }

    fn describe(&self) -> &str {
        &self.port
    }
}
