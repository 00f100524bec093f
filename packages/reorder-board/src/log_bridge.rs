/// Process-wide logger: `env_logger` formatting on stderr, plus an in-memory
/// tail of recent records and a live feed for UI log panels.
use env_logger::Logger;
use log::{Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{LazyLock, Mutex};
use tokio::sync::broadcast;

const MAX_LOG_ENTRIES: usize = 2000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp_ms: u64,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn from_record(record: &Record<'_>) -> Self {
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            timestamp_ms,
            level: record.level().to_string().to_lowercase(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }
    }

    /// Reorder events are tagged `[reorder.<area>.<event>]`.
    pub fn is_reorder_event(&self) -> bool {
        self.message.starts_with("[reorder.")
    }
}

struct LogHub {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
    tx: broadcast::Sender<LogEntry>,
}

impl LogHub {
    fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(512);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            tx,
        }
    }

    fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push_back(entry.clone());
            while entries.len() > self.capacity {
                entries.pop_front();
            }
        }
        // No subscribers is fine.
        let _ = self.tx.send(entry);
    }

    fn recent_entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

static LOG_HUB: LazyLock<LogHub> = LazyLock::new(|| LogHub::with_capacity(MAX_LOG_ENTRIES));

struct BroadcastLogger {
    inner: Logger,
}

impl Log for BroadcastLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.inner.log(record);
        LOG_HUB.push(LogEntry::from_record(record));
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the logger. `RUST_LOG` overrides the default `warn` filter.
pub fn init() -> Result<(), SetLoggerError> {
    let builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    init_with(builder)
}

fn init_with(mut builder: env_logger::Builder) -> Result<(), SetLoggerError> {
    let logger = Box::leak(Box::new(BroadcastLogger {
        inner: builder.build(),
    }));
    log::set_logger(logger)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

pub fn recent_entries() -> Vec<LogEntry> {
    LOG_HUB.recent_entries()
}

pub fn subscribe() -> broadcast::Receiver<LogEntry> {
    LOG_HUB.tx.subscribe()
}
