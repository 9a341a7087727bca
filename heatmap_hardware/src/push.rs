//! Push-driven line source.
//!
//! A reader thread owns the input stream and pushes each non-blank line into a
//! bounded channel. Polls drain the channel and keep only the newest line:
//! the dashboard shows the latest reading, so lines that piled up between
//! ticks are stale and dropped.
use crossbeam_channel as xch;
use heatmap_traits::LineSource;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::error::Result;

pub struct PushSource {
    rx: xch::Receiver<String>,
    name: String,
    dropped: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    closed_reported: bool,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl PushSource {
    /// Spawn the reader thread over any buffered stream.
    pub fn spawn<R: BufRead + Send + 'static>(reader: R, capacity: usize, name: &str) -> Self {
        let (tx, rx) = xch::bounded(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let thread_name = name.to_string();

        let join_handle = std::thread::spawn(move || {
            for line in reader.lines() {
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                match line {
                    Ok(l) => {
                        let l = l.trim();
                        if l.is_empty() {
                            continue;
                        }
                        // Consumer gone: nothing left to feed
                        if tx.send(l.to_string()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(source = %thread_name, error = %e, "push stream read failed");
                        break;
                    }
                }
            }
            tracing::debug!(source = %thread_name, "push reader exiting");
        });

        Self {
            rx,
            name: name.to_string(),
            dropped: Arc::new(AtomicU64::new(0)),
            shutdown,
            closed_reported: false,
            join_handle: Some(join_handle),
        }
    }

    /// Read pushed lines from standard input.
    pub fn stdin(capacity: usize) -> Self {
        Self::spawn(BufReader::new(std::io::stdin()), capacity, "stdin")
    }

    /// Read pushed lines from a file or FIFO; `-` selects standard input.
    pub fn open(path: &Path, capacity: usize) -> Result<Self> {
        if path.as_os_str() == "-" {
            return Ok(Self::stdin(capacity));
        }
        let file = std::fs::File::open(path)?;
        Ok(Self::spawn(
            BufReader::new(file),
            capacity,
            &path.display().to_string(),
        ))
    }

    /// Lines discarded because a newer one arrived before the next poll.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// True once the producer has finished and every queued line was consumed.
    pub fn is_closed(&self) -> bool {
        self.rx.is_empty() && self.join_handle.as_ref().is_none_or(|h| h.is_finished())
    }
}

impl LineSource for PushSource {
    fn poll_line(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let first = match self.rx.recv_timeout(timeout) {
            Ok(line) => line,
            Err(xch::RecvTimeoutError::Timeout) => return Ok(None),
            Err(xch::RecvTimeoutError::Disconnected) => {
                if !self.closed_reported {
                    self.closed_reported = true;
                    tracing::info!(source = %self.name, "push stream closed");
                }
                return Ok(None);
            }
        };
        let mut newest = first;
        for line in self.rx.try_iter() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            newest = line;
        }
        Ok(Some(newest))
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

impl Drop for PushSource {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // A reader blocked on stdin cannot be interrupted; only join finished threads.
        if let Some(handle) = self.join_handle.take() {
            if handle.is_finished() {
                if handle.join().is_err() {
                    tracing::warn!(source = %self.name, "push reader panicked");
                }
            } else {
                tracing::trace!(source = %self.name, "detaching blocked push reader");
            }
        }
    }
}
