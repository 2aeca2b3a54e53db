use std::time::{Duration, Instant};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metrics;
use crate::typing_policy::{classify, KeyAction};

/// Content category a test draws its text from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Code,
    Paragraph,
    Line,
    Logs,
    Shell,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Code,
        Mode::Paragraph,
        Mode::Line,
        Mode::Logs,
        Mode::Shell,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Code => "Code Snippets",
            Mode::Paragraph => "Paragraphs",
            Mode::Line => "Single Lines",
            Mode::Logs => "Log Entries",
            Mode::Shell => "Shell Commands",
        }
    }

    /// Separator used when snippets are concatenated into a long block
    pub fn separator(&self) -> &'static str {
        match self {
            Mode::Paragraph => " ",
            Mode::Code | Mode::Line | Mode::Logs | Mode::Shell => "\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Completed,
}

/// Result of feeding one raw character to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEffect {
    /// The user asked to leave; the session itself is untouched
    Cancel,
    Inserted,
    Erased,
    /// Input past the end of the target is capped
    Dropped,
    /// Nothing to do: erase on empty input, or the session already completed
    Ignored,
}

/// Everything that survives a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub wpm: f64,
    pub accuracy: f64,
    pub chars_typed: usize,
    pub elapsed_secs: f64,
    pub mode: Mode,
    pub time_limit_secs: u64,
}

/// A single typing test: the target text, what has been typed so far and
/// the live metrics derived from it.
#[derive(Debug, Clone)]
pub struct Session {
    target: Vec<char>,
    typed: Vec<char>,
    mode: Mode,
    time_limit_secs: u64,
    started_at: Instant,
    wpm: f64,
    accuracy: f64,
    state: SessionState,
}

impl Session {
    /// `time_limit_secs == 0` runs until the target is typed exactly,
    /// anything else is a countdown.
    pub fn new(target: &str, mode: Mode, time_limit_secs: u64, started_at: Instant) -> Self {
        Self {
            target: target.chars().collect(),
            typed: Vec::new(),
            mode,
            time_limit_secs,
            started_at,
            wpm: 0.0,
            accuracy: 100.0,
            state: SessionState::Running,
        }
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time_limit_secs(&self) -> u64 {
        self.time_limit_secs
    }

    pub fn is_timed(&self) -> bool {
        self.time_limit_secs > 0
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn wpm(&self) -> f64 {
        self.wpm
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn apply_key(&mut self, c: char) -> KeyEffect {
        if self.is_completed() {
            return KeyEffect::Ignored;
        }

        let effect = match classify(c) {
            KeyAction::Cancel => return KeyEffect::Cancel,
            KeyAction::Erase => {
                if self.typed.pop().is_some() {
                    KeyEffect::Erased
                } else {
                    KeyEffect::Ignored
                }
            }
            KeyAction::Insert(c) => {
                if self.typed.len() < self.target.len() {
                    self.typed.push(c);
                    KeyEffect::Inserted
                } else {
                    debug!(?c, "input capped at target length");
                    KeyEffect::Dropped
                }
            }
        };

        if !self.is_timed() && effect != KeyEffect::Ignored && self.typed == self.target {
            self.state = SessionState::Completed;
        }

        effect
    }

    /// Recompute the live metrics and enforce the time limit
    pub fn tick(&mut self, now: Instant) {
        if self.is_completed() {
            return;
        }

        let elapsed = self.elapsed(now);
        self.refresh_metrics(elapsed);

        if self.is_timed() && elapsed >= self.time_limit() {
            self.state = SessionState::Completed;
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Seconds left on the countdown, `None` for untimed sessions
    pub fn time_remaining(&self, now: Instant) -> Option<f64> {
        if !self.is_timed() {
            return None;
        }
        let left = self.time_limit().saturating_sub(self.elapsed(now));
        Some(left.as_secs_f64())
    }

    /// Final figures for the results screen and the history.
    ///
    /// Metrics are brought up to date against `now` so the keystroke that
    /// completed the text is counted.
    pub fn summary(&mut self, now: Instant) -> SessionSummary {
        let elapsed = self.elapsed(now);
        self.refresh_metrics(elapsed);

        SessionSummary {
            wpm: self.wpm,
            accuracy: self.accuracy,
            chars_typed: self.typed.len(),
            elapsed_secs: elapsed.as_secs_f64(),
            mode: self.mode,
            time_limit_secs: self.time_limit_secs,
        }
    }

    fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    fn refresh_metrics(&mut self, elapsed: Duration) {
        if let Some(wpm) = metrics::wpm(self.typed.len(), elapsed) {
            self.wpm = wpm;
        }
        self.accuracy = metrics::accuracy(&self.typed, &self.target);
    }
}
