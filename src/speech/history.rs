//! History of delivered messages, kept in memory and appended to disk.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use chrono::{DateTime, Local};
use serde::Serialize;

use super::{events::SpeechDelivered, types::SpeechDelivery};

const DEFAULT_HISTORY_LOG_PATH: &str = "logs/speech_history.jsonl";

const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Rolling window of the most recent deliveries.
#[derive(Resource, Debug)]
pub struct SpeechHistory {
    capacity: usize,
    records: VecDeque<SpeechRecord>,
}

impl SpeechHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: SpeechRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn records(&self) -> impl Iterator<Item = &SpeechRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&SpeechRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SpeechHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[derive(Debug, Clone)]
pub struct SpeechRecord {
    pub spoken_at: DateTime<Local>,
    pub delivery: SpeechDelivery,
}

impl SpeechRecord {
    pub fn now(delivery: SpeechDelivery) -> Self {
        Self {
            spoken_at: Local::now(),
            delivery,
        }
    }
}

pub fn record_speech_history(
    mut delivered: MessageReader<SpeechDelivered>,
    mut history: ResMut<SpeechHistory>,
    mut log: ResMut<SpeechHistoryLog>,
) {
    for message in delivered.read() {
        if let Some(previous) = history.latest() {
            if previous.delivery.text == message.delivery.text {
                debug!(target: "speech", "Repeated the previous message");
            }
        }
        let record = SpeechRecord::now(message.delivery.clone());
        log.push(&record);
        history.push(record);
        debug!(
            target: "speech",
            "History holds {} of {} recent messages",
            history.len(),
            history.capacity()
        );
    }
}

/// Append-only JSON-lines log of deliveries.
#[derive(Resource, Debug)]
pub struct SpeechHistoryLog {
    output_path: PathBuf,
    pending: Vec<SpeechRecord>,
}

impl SpeechHistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &SpeechRecord) {
        self.pending.push(record.clone());
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in std::mem::take(&mut self.pending) {
            serde_json::to_writer(&mut file, &HistoryLine::from(&record))?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }
}

impl Default for SpeechHistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LOG_PATH)
    }
}

/// Write failures are logged and the pending lines are dropped.
pub fn flush_speech_history_log(mut log: ResMut<SpeechHistoryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            target: "speech",
            "Failed to persist speech history to {:?}: {}",
            log.path(),
            err
        );
    }
}

#[derive(Serialize)]
struct HistoryLine<'a> {
    timestamp: String,
    request_id: u64,
    category: &'static str,
    origin: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'static str>,
}

impl<'a> From<&'a SpeechRecord> for HistoryLine<'a> {
    fn from(record: &'a SpeechRecord) -> Self {
        let delivery = &record.delivery;
        Self {
            timestamp: record.spoken_at.to_rfc3339(),
            request_id: delivery.request_id.value(),
            category: delivery.category.label(),
            origin: delivery.origin.label(),
            message: &delivery.text,
            failure: delivery.failure.as_ref().map(|kind| kind.tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{
        errors::SpeechErrorKind,
        types::{MessageCategory, SpeechOrigin, SpeechPurpose, SpeechRequestId},
    };
    use serde_json::Value;
    use std::{env, fs, time::SystemTime};

    fn delivery(id: u64, text: &str) -> SpeechDelivery {
        SpeechDelivery {
            request_id: SpeechRequestId::new(id),
            category: MessageCategory::Humorous,
            purpose: SpeechPurpose::Scheduled,
            origin: SpeechOrigin::Live,
            text: text.to_string(),
            failure: None,
        }
    }

    #[test]
    fn history_keeps_the_latest_ten() {
        let mut history = SpeechHistory::default();
        for id in 0..15 {
            history.push(SpeechRecord::now(delivery(id, "hi")));
        }
        assert_eq!(history.len(), 10);
        assert_eq!(
            history.records().next().map(|record| record.delivery.request_id.value()),
            Some(5)
        );
        assert_eq!(
            history.latest().map(|record| record.delivery.request_id.value()),
            Some(14)
        );
    }

    #[test]
    fn log_writes_json_lines() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir().join(format!("speech_history_test_{}.jsonl", unique_suffix));

        let mut log = SpeechHistoryLog::new(&path);
        log.push(&SpeechRecord::now(delivery(3, "Why did the cat sit on the computer?")));
        let mut failed = delivery(4, "Remember to drink water!");
        failed.origin = SpeechOrigin::Fallback;
        failed.failure = Some(SpeechErrorKind::Timeout);
        log.push(&SpeechRecord::now(failed));
        log.flush().expect("history log should flush");
        // Flushed lines are not written twice.
        log.flush().expect("second flush is a no-op");

        let raw = fs::read_to_string(&path).expect("log file should exist");
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).expect("json line should parse");
        assert_eq!(first["request_id"], 3);
        assert_eq!(first["category"], "humorous");
        assert_eq!(first["origin"], "live");
        assert!(first.get("failure").is_none());

        let second: Value = serde_json::from_str(lines[1]).expect("json line should parse");
        assert_eq!(second["origin"], "fallback");
        assert_eq!(second["failure"], "timeout");

        let _ = fs::remove_file(&path);
    }
}
