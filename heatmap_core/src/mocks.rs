//! Test and helper sources for heatmap_core

use std::collections::VecDeque;
use std::error::Error;
use std::time::Duration;

type PollResult = Result<Option<String>, Box<dyn Error + Send + Sync>>;

/// Replays a fixed script of poll results, then stays idle.
#[derive(Default)]
pub struct ScriptedSource {
    script: VecDeque<PollResult>,
    polls: u64,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a line for the next poll.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.script.push_back(Ok(Some(line.into())));
        self
    }

    /// Script an idle poll.
    pub fn idle(mut self) -> Self {
        self.script.push_back(Ok(None));
        self
    }

    /// Script a transport failure.
    pub fn fail(mut self, err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.script.push_back(Err(err.into()));
        self
    }

    /// Number of polls observed so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl heatmap_traits::LineSource for ScriptedSource {
    fn poll_line(&mut self, _timeout: Duration) -> PollResult {
        self.polls += 1;
        self.script.pop_front().unwrap_or(Ok(None))
    }

    fn describe(&self) -> &str {
        "scripted"
    }
}
