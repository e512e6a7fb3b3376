//! Progress logging from workers
//!
//! Each worker owns a [`LogSink`] that sends [`LogEvent`]s over a tokio
//! channel to one logger task. Sending never blocks and never fails the
//! crawl: if the logger is gone the event is dropped.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// A progress message emitted by a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// The worker received its shard
    Started { pages: usize },

    /// A shard page is about to be crawled (1-based position)
    Checking {
        position: usize,
        total: usize,
        url: String,
    },

    /// A request is about to be made
    Validating { url: String },

    /// A request failed without producing a response
    Exception { url: String, reason: String },

    /// The shard is exhausted
    Done { passed: usize, failed: usize },
}

/// A worker-tagged log event as received by the logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub worker: usize,
    pub event: LogEvent,
}

/// One-way handle a worker uses to report progress
#[derive(Debug, Clone)]
pub struct LogSink {
    worker: usize,
    tx: UnboundedSender<LogRecord>,
}

impl LogSink {
    /// Index of the worker this sink belongs to
    pub fn worker(&self) -> usize {
        self.worker
    }

    /// Sends an event; silently dropped if the logger has stopped
    pub fn send(&self, event: LogEvent) {
        let _ = self.tx.send(LogRecord {
            worker: self.worker,
            event,
        });
    }
}

/// Creates one sink per worker, all feeding the returned receiver
pub fn log_channel(workers: usize) -> (Vec<LogSink>, UnboundedReceiver<LogRecord>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sinks = (0..workers)
        .map(|worker| LogSink {
            worker,
            tx: tx.clone(),
        })
        .collect();

    (sinks, rx)
}

/// Spawns the aggregating logger
///
/// The task ends once every sink has been dropped.
pub fn spawn_logger(mut rx: UnboundedReceiver<LogRecord>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            emit(&record);
        }
    })
}

fn emit(record: &LogRecord) {
    let worker = record.worker;
    match &record.event {
        LogEvent::Started { pages } => {
            tracing::info!(worker, "Working on {} URLs", pages);
        }
        LogEvent::Checking {
            position,
            total,
            url,
        } => {
            tracing::info!(worker, "[{}/{}] Checking {}", position, total, url);
        }
        LogEvent::Validating { url } => {
            tracing::debug!(worker, "Validating {}", url);
        }
        LogEvent::Exception { url, reason } => {
            tracing::warn!(worker, "Exception for {}: {}", url, reason);
        }
        LogEvent::Done { passed, failed } => {
            tracing::info!(worker, "Done, passed: {}, failed: {}", passed, failed);
        }
    }
}
