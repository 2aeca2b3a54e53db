use std::time::Duration;

use assert_matches::assert_matches;
use ratatui::backend::TestBackend;
use tempfile::tempdir;

use typemaster::clock::ManualClock;
use typemaster::content::{FixedContent, SnippetLibrary};
use typemaster::history::{HistoryStore, JsonHistoryStore};
use typemaster::runtime::{
    LoopSettings, ScriptedInput, SessionLoop, SessionOutcome, SessionRequest,
};
use typemaster::session::Mode;
use typemaster::typing_policy::{DEL, ESC};
use typemaster::ui::TerminalRenderer;

// Polls spent in the results cooldown with the default settings
const COOLDOWN_POLLS: usize = 150;

fn screen_text(renderer: &TerminalRenderer<TestBackend>) -> String {
    renderer
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

// Headless run of a full completion test: typing with a correction, results,
// cooldown, dismissal and a history entry on disk.
#[test]
fn headless_completion_session_is_recorded() {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("history.json");
    let mut history = JsonHistoryStore::open(&history_path);
    let mut content = FixedContent::new("ls -la");
    let mut renderer = TerminalRenderer::new(TestBackend::new(100, 30)).unwrap();
    let clock = ManualClock::new();
    let mut input = ScriptedInput::new()
        .keys("ls -lx")
        .key(DEL)
        .key('a')
        .idle(COOLDOWN_POLLS)
        .key('\r');

    let outcome = SessionLoop::new(
        &mut input,
        &clock,
        &mut renderer,
        &mut history,
        &mut content,
        LoopSettings::default(),
    )
    .run(SessionRequest {
        mode: Mode::Shell,
        time_limit_secs: 0,
    })
    .unwrap();

    let report = assert_matches!(outcome, SessionOutcome::Completed(report) => report);
    assert!(report.record_error.is_none());
    assert_eq!(report.summary.chars_typed, 6);
    assert_eq!(report.summary.accuracy, 100.0);
    // eight keys, one per 50ms tick
    assert!((report.summary.elapsed_secs - 0.35).abs() < 1e-9);

    let text = screen_text(&renderer);
    assert!(text.contains("RESULTS"));
    assert!(text.contains("Press any key to exit"));

    assert_eq!(input.starts(), 1);
    assert_eq!(input.stops(), 1);
    assert_eq!(input.remaining_keys(), 0);

    let reloaded = JsonHistoryStore::open(&history_path);
    assert_eq!(reloaded.entries().len(), 1);
    assert_eq!(reloaded.entries()[0].mode, Mode::Shell);
    assert_eq!(reloaded.entries()[0].chars, 6);
    assert_eq!(reloaded.aggregate(5).tests, 1);
}

#[test]
fn headless_abort_leaves_history_untouched() {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("history.json");
    let mut history = JsonHistoryStore::open(&history_path);
    let mut content = FixedContent::new("fn main() {}");
    let mut renderer = TerminalRenderer::new(TestBackend::new(100, 30)).unwrap();
    let clock = ManualClock::new();
    let mut input = ScriptedInput::new().keys("fn m").key(ESC);

    let outcome = SessionLoop::new(
        &mut input,
        &clock,
        &mut renderer,
        &mut history,
        &mut content,
        LoopSettings::default(),
    )
    .run(SessionRequest {
        mode: Mode::Code,
        time_limit_secs: 0,
    })
    .unwrap();

    assert_matches!(outcome, SessionOutcome::Aborted);
    assert!(!history_path.exists());
    assert_eq!(input.stops(), 1);
    // the last frame is the live view, never results
    assert!(!screen_text(&renderer).contains("RESULTS"));
}

// A timed test with real content runs out the clock; nothing typed means
// nothing recorded.
#[test]
fn headless_timed_session_without_input_is_not_recorded() {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("history.json");
    let mut history = JsonHistoryStore::open(&history_path);
    let mut content = SnippetLibrary::with_seed(5).unwrap();
    let mut renderer = TerminalRenderer::new(TestBackend::new(100, 30)).unwrap();
    let clock = ManualClock::new();
    let settings = LoopSettings {
        tick_interval: Duration::from_millis(100),
        ..LoopSettings::default()
    };
    // 2s at 100ms per tick is 21 polls, then the cooldown
    let mut input = ScriptedInput::new().idle(21 + COOLDOWN_POLLS).key('x');

    let outcome = SessionLoop::new(
        &mut input,
        &clock,
        &mut renderer,
        &mut history,
        &mut content,
        settings,
    )
    .run(SessionRequest {
        mode: Mode::Logs,
        time_limit_secs: 2,
    })
    .unwrap();

    let report = assert_matches!(outcome, SessionOutcome::Completed(report) => report);
    assert_eq!(report.summary.chars_typed, 0);
    assert_eq!(report.summary.wpm, 0.0);
    assert_eq!(report.summary.accuracy, 100.0);
    assert!((report.summary.elapsed_secs - 2.0).abs() < 1e-9);
    assert!(!history_path.exists());
    assert!(screen_text(&renderer).contains("2s (timed)"));
    assert_eq!(input.remaining_keys(), 0);
}

#[test]
fn headless_timed_session_types_into_long_block() {
    let mut content = SnippetLibrary::with_seed(9).unwrap();
    let dir = tempdir().unwrap();
    let mut history = JsonHistoryStore::open(dir.path().join("history.json"));
    let mut renderer = TerminalRenderer::new(TestBackend::new(100, 30)).unwrap();
    let clock = ManualClock::new();
    // one second of keys that almost certainly miss the target
    let mut input = ScriptedInput::new()
        .keys("~~~~~")
        .idle(16 + COOLDOWN_POLLS)
        .key('x');

    let outcome = SessionLoop::new(
        &mut input,
        &clock,
        &mut renderer,
        &mut history,
        &mut content,
        LoopSettings::default(),
    )
    .run(SessionRequest {
        mode: Mode::Paragraph,
        time_limit_secs: 1,
    })
    .unwrap();

    let report = assert_matches!(outcome, SessionOutcome::Completed(report) => report);
    assert_eq!(report.summary.chars_typed, 5);
    assert_eq!(report.summary.accuracy, 0.0);
    // 5 chars in one second is 60 wpm
    assert!((report.summary.wpm - 60.0).abs() < 1e-9);
    assert_eq!(history.entries().len(), 1);
    assert_eq!(history.entries()[0].time_limit, 1);
}

#[test]
fn headless_cooldown_swallows_early_keys() {
    let dir = tempdir().unwrap();
    let mut history = JsonHistoryStore::open(dir.path().join("history.json"));
    let mut content = FixedContent::new("cd");
    let mut renderer = TerminalRenderer::new(TestBackend::new(100, 30)).unwrap();
    let clock = ManualClock::new();
    let mut input = ScriptedInput::new()
        .keys("cd")
        .keys("zzz")
        .idle(COOLDOWN_POLLS)
        .key('q');

    let outcome = SessionLoop::new(
        &mut input,
        &clock,
        &mut renderer,
        &mut history,
        &mut content,
        LoopSettings::default(),
    )
    .run(SessionRequest {
        mode: Mode::Shell,
        time_limit_secs: 0,
    })
    .unwrap();

    assert_matches!(outcome, SessionOutcome::Completed(_));
    // the z's were drained, q ended the results screen
    assert_eq!(input.remaining_keys(), 0);
    assert!(clock.offset() >= Duration::from_millis(1500));
}
