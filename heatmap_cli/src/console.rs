//! Stdin console: one command per line, forwarded to the refresh loop.

use crossbeam_channel as xch;
use heatmap_core::Control;
use std::io::BufRead;

/// Map one console line to a control. Unknown input yields `None`.
pub fn parse_command(line: &str) -> Option<Control> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "reset" => Some(Control::Reset),
        "e" | "export" => Some(Control::Export),
        "q" | "quit" | "exit" => Some(Control::Quit),
        _ => None,
    }
}

/// Spawn a detached thread reading commands from `input`.
///
/// The thread ends at EOF or when the loop side hangs up; a thread blocked on
/// stdin is left to die with the process.
pub fn spawn<R: BufRead + Send + 'static>(input: R) -> xch::Receiver<Control> {
    let (tx, rx) = xch::bounded(16);
    std::thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(c) => {
                    if tx.send(c).is_err() {
                        break;
                    }
                }
                None => {
                    tracing::warn!(input = %line.trim(), "unknown console command (try reset, export, quit)");
                }
            }
        }
        tracing::debug!("console reader exiting");
    });
    rx
}
