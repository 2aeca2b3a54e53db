use std::fs;

use tempfile::tempdir;
use typemaster::history::{HistoryStore, JsonHistoryStore};
use typemaster::session::{Mode, SessionSummary};

fn summary(mode: Mode, wpm: f64, accuracy: f64, time_limit_secs: u64) -> SessionSummary {
    SessionSummary {
        wpm,
        accuracy,
        chars_typed: 200,
        elapsed_secs: 30.04,
        mode,
        time_limit_secs,
    }
}

#[test]
fn history_survives_reopen_with_one_decimal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("history.json");

    {
        let mut store = JsonHistoryStore::open(&path);
        store.record(&summary(Mode::Code, 48.26, 97.44, 0)).unwrap();
        store.record(&summary(Mode::Logs, 71.75, 88.88, 30)).unwrap();
    }

    let store = JsonHistoryStore::open(&path);
    let stats = store.aggregate(5);
    assert_eq!(stats.tests, 2);
    assert_eq!(stats.best_wpm, 71.8);
    assert_eq!(stats.best_accuracy, 97.4);
    assert_eq!(stats.total_chars, 400);
    assert_eq!(stats.recent[0].mode, Mode::Logs);
    assert_eq!(stats.recent[0].time_limit, 30);
    assert_eq!(stats.recent[1].wpm, 48.3);
    assert_eq!(stats.recent[1].elapsed, 30.0);
}

#[test]
fn corrupt_history_is_replaced_on_next_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, "not json at all").unwrap();

    let mut store = JsonHistoryStore::open(&path);
    assert!(store.aggregate(5).is_empty());
    store.record(&summary(Mode::Paragraph, 55.0, 100.0, 0)).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
    assert_eq!(parsed[0]["mode"], "paragraph");
}
