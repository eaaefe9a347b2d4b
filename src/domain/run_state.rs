//! Run state and related types
//!
//! RunState is the snapshot the dashboard renders: status, wallet, cycle
//! progress and a bounded log. The orchestrator is its only writer.

use std::collections::VecDeque;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Most log lines kept; older lines are evicted first
pub const LOG_CAPACITY: usize = 100;

/// Status of the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// No run since process start
    #[default]
    Idle,
    /// Resolving credentials and balance
    Starting,
    /// Executing cycles
    Running,
    /// All cycles finished
    Completed,
    /// Aborted by a fatal error or cancellation
    Error,
}

impl RunStatus {
    /// Returns true while a run owns the signer
    pub fn is_active(&self) -> bool {
        matches!(self, RunStatus::Starting | RunStatus::Running)
    }

    /// Returns true if the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Error)
    }
}

/// Append-only log that keeps the newest `LOG_CAPACITY` lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RunLog {
    lines: VecDeque<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        while self.lines.len() > LOG_CAPACITY {
            self.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for RunLog {
    fn from(lines: Vec<String>) -> Self {
        let mut log = RunLog::new();
        for line in lines {
            log.push(line);
        }
        log
    }
}

impl From<RunLog> for Vec<String> {
    fn from(log: RunLog) -> Self {
        log.lines.into()
    }
}

/// Cycle counters; `current` never exceeds `total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProgress {
    pub current: u32,
    pub total: u32,
}

impl CycleProgress {
    pub fn new(total: u32) -> Self {
        Self { current: 0, total }
    }

    pub fn advance_to(&mut self, cycle: u32) {
        self.current = cycle.min(self.total);
    }
}

/// One adapter as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    pub status: String,
}

impl ServiceEntry {
    pub fn ready(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: "Ready".to_string(),
        }
    }
}

/// Snapshot of the single process-wide run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    pub status: RunStatus,
    /// Masked signer address
    pub wallet: String,
    /// Native balance at start, 6 decimals
    pub balance: String,
    pub cycles: CycleProgress,
    /// Run start in ms since epoch
    pub start_time: Option<i64>,
    pub logs: RunLog,
    pub services: Vec<ServiceEntry>,
}

impl RunState {
    /// State before any run has started
    pub fn idle(total_cycles: u32) -> Self {
        Self {
            status: RunStatus::Idle,
            wallet: String::new(),
            balance: "0.0000".to_string(),
            cycles: CycleProgress::new(total_cycles),
            start_time: None,
            logs: RunLog::new(),
            services: Vec::new(),
        }
    }

    /// Fresh state for a run that is starting now
    pub fn starting(total_cycles: u32) -> Self {
        Self {
            status: RunStatus::Starting,
            start_time: Some(chrono::Utc::now().timestamp_millis()),
            ..Self::idle(total_cycles)
        }
    }
}

/// Prefix a message with the local wall-clock time
pub fn stamp(message: &str) -> String {
    format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_activity() {
        assert!(!RunStatus::Idle.is_active());
        assert!(RunStatus::Starting.is_active());
        assert!(RunStatus::Running.is_active());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Error.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
    }

    #[test]
    fn test_log_evicts_oldest() {
        let mut log = RunLog::new();
        for i in 0..LOG_CAPACITY {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.iter().next(), Some("line 0"));

        log.push("line 100");
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.iter().next(), Some("line 1"));
        assert_eq!(log.last(), Some("line 100"));
    }

    #[test]
    fn test_log_from_long_vec_keeps_newest() {
        let lines: Vec<String> = (0..150).map(|i| i.to_string()).collect();
        let log = RunLog::from(lines);
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.iter().next(), Some("50"));
    }

    #[test]
    fn test_cycle_progress_clamped() {
        let mut progress = CycleProgress::new(3);
        progress.advance_to(2);
        assert_eq!(progress.current, 2);
        progress.advance_to(9);
        assert_eq!(progress.current, 3);
    }

    #[test]
    fn test_starting_resets_everything() {
        let state = RunState::starting(5);
        assert_eq!(state.status, RunStatus::Starting);
        assert!(state.start_time.is_some());
        assert!(state.logs.is_empty());
        assert_eq!(state.cycles, CycleProgress { current: 0, total: 5 });
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut state = RunState::idle(2);
        state.logs.push("[12:00:00] hello");
        state.services.push(ServiceEntry::ready("swap"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "Idle");
        assert_eq!(json["cycles"]["total"], 2);
        assert_eq!(json["startTime"], serde_json::Value::Null);
        assert_eq!(json["logs"][0], "[12:00:00] hello");
        assert_eq!(json["services"][0]["status"], "Ready");

        let restored: RunState = serde_json::from_value(json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_stamp_format() {
        let line = stamp("hello");
        assert!(line.starts_with('['));
        assert_eq!(&line[9..], "] hello");
    }
}
