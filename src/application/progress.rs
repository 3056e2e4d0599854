//! Typed progress feed for a collection run
//!
//! Single producer: the orchestrator writes timestamped event records into
//! an unbounded channel, the transport layer drains them in order. Events
//! are mirrored into the process log so a run is observable without a
//! consumer attached.

use chrono::Utc;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::mpsc;

use crate::utils::logging;

/// Severity/kind of one progress record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Info,
    Success,
    Warning,
    Error,
    Progress,
    Complete,
}

/// One record of the progress feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: ProgressKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// RFC 3339 emission time
    pub timestamp: String,
}

/// Final counters carried by the `complete` event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub checkpoints_processed: u64,
    pub wallets_inserted: u64,
    pub transactions_inserted: u64,
    pub relationships_inserted: u64,
}

/// Append-only sink for progress events
pub struct ProgressReporter {
    sender: mpsc::UnboundedSender<ProgressEvent>,
    /// Highest percentage emitted so far; later emissions are clamped to
    /// keep the feed monotone even where phase bands overlap
    high_water: AtomicU8,
}

impl ProgressReporter {
    /// Create a reporter and the receiving end of its feed
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender,
                high_water: AtomicU8::new(0),
            },
            receiver,
        )
    }

    fn send(&self, kind: ProgressKind, message: &str, data: Option<Value>) {
        match kind {
            ProgressKind::Warning => logging::log_warning(message),
            ProgressKind::Error => logging::log_error(message),
            _ => logging::log_info(message),
        }

        let event = ProgressEvent {
            kind,
            message: message.to_string(),
            data,
            timestamp: Utc::now().to_rfc3339(),
        };
        // A dropped receiver only means nobody is listening anymore
        let _ = self.sender.send(event);
    }

    pub fn info(&self, message: &str) {
        self.send(ProgressKind::Info, message, None);
    }

    pub fn success(&self, message: &str) {
        self.send(ProgressKind::Success, message, None);
    }

    pub fn warning(&self, message: &str) {
        self.send(ProgressKind::Warning, message, None);
    }

    pub fn error(&self, message: &str) {
        self.send(ProgressKind::Error, message, None);
    }

    /// Emit a percentage update, clamped to 0–100 and to the run's high
    /// water mark so the feed never goes backwards
    pub fn progress(&self, message: &str, percent: u8) {
        let capped = percent.min(100);
        let clamped = self
            .high_water
            .fetch_max(capped, Ordering::Relaxed)
            .max(capped);
        self.send(
            ProgressKind::Progress,
            message,
            Some(json!({ "progress": clamped })),
        );
    }

    /// Emit the terminal success record with the run's final counters
    pub fn complete(&self, message: &str, stats: &RunStats) {
        self.send(
            ProgressKind::Complete,
            message,
            Some(json!({ "stats": stats })),
        );
    }
}

/// Adapt a feed receiver into a `Stream` for transport layers
pub fn into_stream(
    receiver: mpsc::UnboundedReceiver<ProgressEvent>,
) -> impl Stream<Item = ProgressEvent> {
    futures::stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|event| (event, receiver))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotone() {
        let (reporter, mut receiver) = ProgressReporter::channel();
        reporter.progress("a", 30);
        reporter.progress("b", 65);
        reporter.progress("c", 60);
        reporter.progress("d", 80);

        let mut seen = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            let pct = event.data.unwrap()["progress"].as_u64().unwrap();
            seen.push(pct);
        }
        assert_eq!(seen, vec![30, 65, 65, 80]);
    }

    #[test]
    fn test_percent_is_capped_at_100() {
        let (reporter, mut receiver) = ProgressReporter::channel();
        reporter.progress("over", 140);
        let event = receiver.try_recv().unwrap();
        assert_eq!(event.data.unwrap()["progress"], 100);
    }

    #[test]
    fn test_event_serialization_shape() {
        let (reporter, mut receiver) = ProgressReporter::channel();
        reporter.complete(
            "done",
            &RunStats {
                checkpoints_processed: 2,
                wallets_inserted: 3,
                transactions_inserted: 4,
                relationships_inserted: 1,
            },
        );

        let event = receiver.try_recv().unwrap();
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["data"]["stats"]["checkpointsProcessed"], 2);
        assert_eq!(value["data"]["stats"]["walletsInserted"], 3);
        assert_eq!(value["data"]["stats"]["transactionsInserted"], 4);
        assert_eq!(value["data"]["stats"]["relationshipsInserted"], 1);
        assert!(value["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_send_survives_dropped_receiver() {
        let (reporter, receiver) = ProgressReporter::channel();
        drop(receiver);
        reporter.info("nobody listening");
    }
}
