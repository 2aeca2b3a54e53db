use std::collections::VecDeque;
use std::io;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::content::ContentSource;
use crate::history::{HistoryError, HistoryStore};
use crate::session::{KeyEffect, Mode, Session, SessionSummary};
use crate::typing_policy::{BS, CR, DEL, ESC, ETX};
use crate::ui::{results::ResultsFrame, typing::LiveFrame, Renderer, Screen};

/// Non-blocking, character-at-a-time keyboard input
pub trait InputSource {
    /// Enter unbuffered, no-echo mode
    fn start(&mut self);
    /// Restore the terminal mode saved by `start`
    fn stop(&mut self);
    /// Discard everything already typed but not yet read
    fn flush(&mut self);
    /// The next pending character, if any. Never blocks.
    fn poll_char(&mut self) -> Option<char>;

    /// `start` now, `stop` when the guard goes out of scope
    fn acquire(&mut self) -> InputGuard<'_, Self>
    where
        Self: Sized,
    {
        InputGuard::new(self)
    }
}

/// Scoped input acquisition: released on every exit path, panics included
pub struct InputGuard<'a, S: InputSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: InputSource + ?Sized> InputGuard<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        source.start();
        Self { source }
    }
}

impl<S: InputSource + ?Sized> Deref for InputGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.source
    }
}

impl<S: InputSource + ?Sized> DerefMut for InputGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.source
    }
}

impl<S: InputSource + ?Sized> Drop for InputGuard<'_, S> {
    fn drop(&mut self) {
        self.source.stop();
    }
}

/// Map a terminal key event onto the raw character a cbreak terminal would
/// deliver. Releases and keys with no character meaning map to `None`.
pub fn key_to_char(key: KeyEvent) -> Option<char> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => Some(ETX),
        KeyCode::Char('h') if ctrl => Some(BS),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(c),
        KeyCode::Esc => Some(ESC),
        KeyCode::Backspace => Some(DEL),
        KeyCode::Enter => Some(CR),
        KeyCode::Tab => Some('\t'),
        _ => None,
    }
}

/// Production input over crossterm raw mode
#[derive(Debug, Default)]
pub struct CrosstermInput {
    raw: bool,
}

impl CrosstermInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_event() -> Option<CtEvent> {
        match event::poll(Duration::ZERO) {
            Ok(true) => match event::read() {
                Ok(ev) => Some(ev),
                Err(err) => {
                    debug!(%err, "failed to read terminal event");
                    None
                }
            },
            Ok(false) => None,
            Err(err) => {
                debug!(%err, "failed to poll terminal events");
                None
            }
        }
    }
}

impl InputSource for CrosstermInput {
    fn start(&mut self) {
        if self.raw {
            return;
        }
        match enable_raw_mode() {
            Ok(()) => self.raw = true,
            Err(err) => warn!(%err, "unable to enter raw mode, input stays buffered"),
        }
    }

    fn stop(&mut self) {
        if !self.raw {
            return;
        }
        if let Err(err) = disable_raw_mode() {
            warn!(%err, "unable to restore terminal mode");
        }
        self.raw = false;
    }

    fn flush(&mut self) {
        while Self::next_event().is_some() {}
    }

    fn poll_char(&mut self) -> Option<char> {
        while let Some(ev) = Self::next_event() {
            if let CtEvent::Key(key) = ev {
                if let Some(c) = key_to_char(key) {
                    return Some(c);
                }
            }
        }
        None
    }
}

/// Polls tolerated past the end of a script before [`ScriptedInput`] gives up
const EXHAUSTED_POLL_LIMIT: usize = 100_000;

#[derive(Debug, Clone, Copy)]
enum Step {
    Key(char),
    Idle(usize),
}

/// Deterministic input for headless runs.
///
/// The script models arrivals over time: `idle(n)` answers the next `n` polls
/// with nothing, keys are handed out one per poll. `flush` only counts calls
/// since scripted keys have not arrived yet when it runs. Polling far past the
/// end of the script panics instead of spinning forever.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<Step>,
    exhausted_polls: usize,
    starts: usize,
    stops: usize,
    flushes: usize,
    polls: usize,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(mut self, keys: &str) -> Self {
        self.script.extend(keys.chars().map(Step::Key));
        self
    }

    pub fn key(mut self, key: char) -> Self {
        self.script.push_back(Step::Key(key));
        self
    }

    pub fn idle(mut self, polls: usize) -> Self {
        if polls > 0 {
            self.script.push_back(Step::Idle(polls));
        }
        self
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn stops(&self) -> usize {
        self.stops
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Scripted keys not handed out yet
    pub fn remaining_keys(&self) -> usize {
        self.script
            .iter()
            .filter(|step| matches!(step, Step::Key(_)))
            .count()
    }
}

impl InputSource for ScriptedInput {
    fn start(&mut self) {
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn poll_char(&mut self) -> Option<char> {
        self.polls += 1;
        match self.script.pop_front() {
            Some(Step::Key(c)) => Some(c),
            Some(Step::Idle(n)) => {
                if n > 1 {
                    self.script.push_front(Step::Idle(n - 1));
                }
                None
            }
            None => {
                self.exhausted_polls += 1;
                assert!(
                    self.exhausted_polls < EXHAUSTED_POLL_LIMIT,
                    "input script exhausted"
                );
                None
            }
        }
    }
}

/// Loop cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Target duration of one poll/update/render iteration
    pub tick_interval: Duration,
    /// How long the results screen ignores keys
    pub cooldown: Duration,
    /// Sleep between polls while waiting for a key
    pub idle_poll: Duration,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            cooldown: Duration::from_millis(1500),
            idle_poll: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRequest {
    pub mode: Mode,
    /// 0 for a completion test
    pub time_limit_secs: u64,
}

#[derive(Debug)]
pub struct SessionReport {
    pub summary: SessionSummary,
    /// Set when the finished session could not be written to history
    pub record_error: Option<HistoryError>,
}

#[derive(Debug)]
pub enum SessionOutcome {
    /// The user cancelled; nothing was recorded
    Aborted,
    Completed(SessionReport),
}

/// Runs one typing test from the first frame to the dismissed results screen
pub struct SessionLoop<'a> {
    input: &'a mut dyn InputSource,
    clock: &'a dyn Clock,
    renderer: &'a mut dyn Renderer,
    history: &'a mut dyn HistoryStore,
    content: &'a mut dyn ContentSource,
    settings: LoopSettings,
}

impl<'a> SessionLoop<'a> {
    pub fn new(
        input: &'a mut dyn InputSource,
        clock: &'a dyn Clock,
        renderer: &'a mut dyn Renderer,
        history: &'a mut dyn HistoryStore,
        content: &'a mut dyn ContentSource,
        settings: LoopSettings,
    ) -> Self {
        Self {
            input,
            clock,
            renderer,
            history,
            content,
            settings,
        }
    }

    pub fn run(&mut self, request: SessionRequest) -> io::Result<SessionOutcome> {
        let clock = self.clock;
        let settings = self.settings;

        let target = if request.time_limit_secs > 0 {
            self.content.long_block(request.mode)
        } else {
            self.content.snippet(request.mode)
        };

        let mut input = InputGuard::new(&mut *self.input);
        input.flush();

        let mut session = Session::new(&target, request.mode, request.time_limit_secs, clock.now());
        info!(
            mode = %request.mode,
            time_limit_secs = request.time_limit_secs,
            target_chars = session.target().len(),
            "session started"
        );

        loop {
            let frame_start = clock.now();

            if let Some(c) = input.poll_char() {
                if session.apply_key(c) == KeyEffect::Cancel {
                    info!(typed = session.typed().len(), "session aborted");
                    return Ok(SessionOutcome::Aborted);
                }
            }

            let now = clock.now();
            if !session.is_completed() {
                session.tick(now);
            }

            self.renderer
                .draw(&Screen::Live(LiveFrame::from_session(&session, now)))?;

            if session.is_completed() {
                break;
            }

            let spent = clock.elapsed_since(frame_start);
            clock.sleep(settings.tick_interval.saturating_sub(spent));
        }

        let summary = session.summary(clock.now());
        info!(
            wpm = summary.wpm,
            accuracy = summary.accuracy,
            chars = summary.chars_typed,
            elapsed_secs = summary.elapsed_secs,
            "session completed"
        );

        let record_error = if summary.chars_typed > 0 {
            match self.history.record(&summary) {
                Ok(()) => None,
                Err(err) => {
                    error!(%err, "failed to record session");
                    Some(err)
                }
            }
        } else {
            None
        };

        self.renderer
            .draw(&Screen::Results(ResultsFrame::from(&summary)))?;

        // keys typed in the cooldown are thrown away
        let deadline = clock.now() + settings.cooldown;
        while clock.now() < deadline {
            while input.poll_char().is_some() {}
            clock.sleep(settings.idle_poll);
        }
        input.flush();
        wait_for_key(&mut *input, clock, settings.idle_poll);

        Ok(SessionOutcome::Completed(SessionReport {
            summary,
            record_error,
        }))
    }
}

/// Block until any key arrives
pub fn wait_for_key<I: InputSource + ?Sized>(
    input: &mut I,
    clock: &dyn Clock,
    idle_poll: Duration,
) -> char {
    loop {
        if let Some(c) = input.poll_char() {
            return c;
        }
        clock.sleep(idle_poll);
    }
}
