use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::session::{Mode, SessionSummary};
use crate::util::{mean, round_tenth};

/// Number of entries shown in the dashboard's history graph
pub const GRAPH_ENTRIES: usize = 30;

/// One finished test as persisted on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub wpm: f64,
    pub accuracy: f64,
    pub chars: usize,
    pub elapsed: f64,
    pub mode: Mode,
    pub time_limit: u64,
}

impl HistoryEntry {
    pub fn from_summary(summary: &SessionSummary, timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            wpm: round_tenth(summary.wpm),
            accuracy: round_tenth(summary.accuracy),
            chars: summary.chars_typed,
            elapsed: round_tenth(summary.elapsed_secs),
            mode: summary.mode,
            time_limit: summary.time_limit_secs,
        }
    }
}

/// Aggregate view over every recorded test
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStats {
    pub tests: usize,
    pub avg_wpm: f64,
    pub best_wpm: f64,
    pub avg_accuracy: f64,
    pub best_accuracy: f64,
    pub total_chars: usize,
    pub total_secs: f64,
    /// Most recent entries, newest first
    pub recent: Vec<HistoryEntry>,
    /// Last [`GRAPH_ENTRIES`] wpm values, oldest first
    pub wpm_series: Vec<f64>,
    /// Last [`GRAPH_ENTRIES`] accuracy values, oldest first
    pub accuracy_series: Vec<f64>,
}

impl HistoryStats {
    pub fn from_entries(entries: &[HistoryEntry], recent: usize) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let wpms: Vec<f64> = entries.iter().map(|e| e.wpm).collect();
        let accs: Vec<f64> = entries.iter().map(|e| e.accuracy).collect();
        let graph_start = entries.len().saturating_sub(GRAPH_ENTRIES);

        Self {
            tests: entries.len(),
            avg_wpm: mean(&wpms).unwrap_or_default(),
            best_wpm: wpms.iter().copied().fold(f64::MIN, f64::max),
            avg_accuracy: mean(&accs).unwrap_or_default(),
            best_accuracy: accs.iter().copied().fold(f64::MIN, f64::max),
            total_chars: entries.iter().map(|e| e.chars).sum(),
            total_secs: entries.iter().map(|e| e.elapsed).sum(),
            recent: entries.iter().rev().take(recent).cloned().collect(),
            wpm_series: wpms[graph_start..].to_vec(),
            accuracy_series: accs[graph_start..].to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tests == 0
    }
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("failed to write history to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where finished sessions go
pub trait HistoryStore {
    /// Append one entry and persist it
    fn record(&mut self, summary: &SessionSummary) -> Result<(), HistoryError>;
    /// Aggregate statistics with the `recent` latest entries attached
    fn aggregate(&self, recent: usize) -> HistoryStats;
}

/// History kept as a pretty-printed JSON array, loaded once and rewritten on
/// every record.
#[derive(Debug)]
pub struct JsonHistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl JsonHistoryStore {
    /// Load the history at `path`. A missing or unreadable file is an empty
    /// history.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = load_entries(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn save(&self) -> Result<(), HistoryError> {
        let io_err = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let data = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

impl HistoryStore for JsonHistoryStore {
    fn record(&mut self, summary: &SessionSummary) -> Result<(), HistoryError> {
        let entry = HistoryEntry::from_summary(summary, Local::now());
        self.entries.push(entry);

        if let Err(err) = self.save() {
            // keep memory consistent with disk
            self.entries.pop();
            return Err(err);
        }

        info!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "recorded session"
        );
        Ok(())
    }

    fn aggregate(&self, recent: usize) -> HistoryStats {
        HistoryStats::from_entries(&self.entries, recent)
    }
}

fn load_entries(path: &Path) -> Vec<HistoryEntry> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), %err, "unable to read history, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), %err, "corrupt history, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn summary(wpm: f64, accuracy: f64, chars: usize) -> SessionSummary {
        SessionSummary {
            wpm,
            accuracy,
            chars_typed: chars,
            elapsed_secs: 12.345,
            mode: Mode::Code,
            time_limit_secs: 0,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonHistoryStore::open(dir.path().join("history.json"));

        assert!(store.entries().is_empty());
        assert!(store.aggregate(5).is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = JsonHistoryStore::open(&path);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_record_rounds_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut store = JsonHistoryStore::open(&path);
        store.record(&summary(61.234, 90.909, 42)).unwrap();

        let reloaded = JsonHistoryStore::open(&path);
        assert_eq!(reloaded.entries().len(), 1);
        let entry = &reloaded.entries()[0];
        assert_eq!(entry.wpm, 61.2);
        assert_eq!(entry.accuracy, 90.9);
        assert_eq!(entry.chars, 42);
        assert_eq!(entry.elapsed, 12.3);
        assert_eq!(entry.mode, Mode::Code);
        assert_eq!(entry.time_limit, 0);
    }

    #[test]
    fn test_persisted_field_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut store = JsonHistoryStore::open(&path);
        store.record(&summary(50.0, 100.0, 10)).unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let entry = &raw.as_array().unwrap()[0];
        for key in [
            "timestamp",
            "wpm",
            "accuracy",
            "chars",
            "elapsed",
            "mode",
            "time_limit",
        ] {
            assert!(entry.get(key).is_some(), "missing {key}");
        }
        assert_eq!(entry["mode"], "code");
    }

    #[test]
    fn test_aggregate() {
        let dir = tempdir().unwrap();
        let mut store = JsonHistoryStore::open(dir.path().join("history.json"));
        store.record(&summary(40.0, 90.0, 100)).unwrap();
        store.record(&summary(60.0, 100.0, 200)).unwrap();
        store.record(&summary(50.0, 95.0, 300)).unwrap();

        let stats = store.aggregate(2);
        assert_eq!(stats.tests, 3);
        assert_eq!(stats.avg_wpm, 50.0);
        assert_eq!(stats.best_wpm, 60.0);
        assert_eq!(stats.avg_accuracy, 95.0);
        assert_eq!(stats.best_accuracy, 100.0);
        assert_eq!(stats.total_chars, 600);
        assert!((stats.total_secs - 36.9).abs() < 1e-9);

        assert_eq!(stats.recent.len(), 2);
        assert_eq!(stats.recent[0].wpm, 50.0);
        assert_eq!(stats.recent[1].wpm, 60.0);
        assert_eq!(stats.wpm_series, vec![40.0, 60.0, 50.0]);
    }

    #[test]
    fn test_graph_series_keeps_last_entries() {
        let entries: Vec<HistoryEntry> = (0..40)
            .map(|i| HistoryEntry::from_summary(&summary(i as f64, 100.0, 1), Local::now()))
            .collect();

        let stats = HistoryStats::from_entries(&entries, 5);
        assert_eq!(stats.wpm_series.len(), GRAPH_ENTRIES);
        assert_eq!(stats.wpm_series[0], 10.0);
        assert_eq!(*stats.wpm_series.last().unwrap(), 39.0);
        assert_eq!(stats.recent.len(), 5);
    }

    #[test]
    fn test_write_failure_surfaces_and_keeps_memory_consistent() {
        let dir = tempdir().unwrap();
        // a directory where the file should be makes the write fail
        let path = dir.path().join("history.json");
        fs::create_dir_all(&path).unwrap();

        let mut store = JsonHistoryStore::open(&path);
        let result = store.record(&summary(50.0, 100.0, 10));

        assert!(matches!(result, Err(HistoryError::Io { .. })));
        assert!(store.entries().is_empty());
    }
}
