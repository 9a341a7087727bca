use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Default upper bound for a single input line.
pub const MAX_LINE_BYTES: usize = 256;

/// Read one newline-terminated line from `reader`, giving up at `timeout`.
///
/// - Returns `Ok(None)` when nothing (or only blank lines) arrived before the
///   deadline or the stream ended.
/// - Returns `HwError::Timeout` when the deadline passes in the middle of a line.
/// - Trailing `\r` is stripped; the text is decoded lossily as UTF-8.
///
/// Readers with their own read timeout (serial ports) report it as
/// `TimedOut`/`WouldBlock`; those are retried until the deadline. The deadline
/// is checked after every read, so a peer that keeps sending blank lines
/// cannot hold the caller past `timeout`.
pub fn read_line_with_timeout<R: Read + ?Sized>(
    reader: &mut R,
    timeout: Duration,
    max_len: usize,
) -> Result<Option<String>> {
    read_line_until(reader, Instant::now() + timeout, max_len)
}

/// Like [`read_line_with_timeout`], for a stream joined mid-flight.
///
/// Everything up to and including the first `\n` is dropped before a line is
/// collected, so the result always starts where the sender started it. A
/// sender that is exactly at a line boundary loses that one line.
pub fn read_synced_line<R: Read + ?Sized>(
    reader: &mut R,
    timeout: Duration,
    max_len: usize,
) -> Result<Option<String>> {
    let deadline = Instant::now() + timeout;
    let dropped = match skip_past_newline(reader, deadline)? {
        Some(n) => n,
        None => return Ok(None),
    };
    if dropped > 0 {
        tracing::trace!(dropped, "skipped partial line");
    }
    read_line_until(reader, deadline, max_len)
}

/// Consume bytes through the next `\n`. `None` if the stream ended or the
/// deadline passed first; otherwise the number of bytes dropped before it.
fn skip_past_newline<R: Read + ?Sized>(reader: &mut R, deadline: Instant) -> Result<Option<usize>> {
    let mut byte = [0u8; 1];
    let mut dropped = 0usize;
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) if byte[0] == b'\n' => return Ok(Some(dropped)),
            Ok(_) => dropped += 1,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {}
            Err(e) => return Err(e.into()),
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
    }
}

fn read_line_until<R: Read + ?Sized>(
    reader: &mut R,
    deadline: Instant,
    max_len: usize,
) -> Result<Option<String>> {
    let mut buf: Vec<u8> = Vec::with_capacity(64);
    let mut byte = [0u8; 1];

    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => {
                if trimmed_len(&buf) > 0 {
                    break;
                }
                buf.clear();
            }
            Ok(_) => {
                buf.push(byte[0]);
                if buf.len() > max_len {
                    return Err(HwError::LineTooLong(max_len));
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {}
            Err(e) => return Err(e.into()),
        }
        if Instant::now() >= deadline {
            if trimmed_len(&buf) == 0 {
                return Ok(None);
            }
            return Err(HwError::Timeout(buf.len()));
        }
    }

    if trimmed_len(&buf) == 0 {
        return Ok(None);
    }
    let text = String::from_utf8_lossy(&buf);
    Ok(Some(text.trim_end_matches('\r').to_string()))
}

fn trimmed_len(buf: &[u8]) -> usize {
    buf.iter().filter(|b| !b.is_ascii_whitespace()).count()
}
