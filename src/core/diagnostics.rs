//! Persisted ring buffer of recent errors and market data events, kept for troubleshooting.

use crate::core::cache::KeyValueCollection;
use crate::core::market::NotificationLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 100;
const ENTRIES_KEY: &[u8] = b"entries";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    ApiError,
    GlobalError,
    Info,
    Success,
    Warning,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EntryKind::ApiError => "API_ERROR",
                EntryKind::GlobalError => "GLOBAL_ERROR",
                EntryKind::Info => "INFO",
                EntryKind::Success => "SUCCESS",
                EntryKind::Warning => "WARNING",
            }
        )
    }
}

impl From<NotificationLevel> for EntryKind {
    fn from(level: NotificationLevel) -> Self {
        match level {
            NotificationLevel::Success => EntryKind::Success,
            NotificationLevel::Info => EntryKind::Info,
            NotificationLevel::Warning => EntryKind::Warning,
            NotificationLevel::Error => EntryKind::ApiError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: EntryKind,
    pub message: String,
}

pub struct DiagnosticsLog {
    collection: Arc<dyn KeyValueCollection>,
    capacity: usize,
    // serializes read-modify-write of the entry list
    write_lock: Mutex<()>,
}

impl DiagnosticsLog {
    pub fn new(collection: Arc<dyn KeyValueCollection>) -> Self {
        Self::with_capacity(collection, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(collection: Arc<dyn KeyValueCollection>, capacity: usize) -> Self {
        Self {
            collection,
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Oldest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        let Some(raw) = self.collection.get(ENTRIES_KEY).await else {
            return Vec::new();
        };
        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            debug!("Discarding unreadable diagnostics log: {}", e);
            Vec::new()
        })
    }

    pub async fn record(&self, kind: EntryKind, message: impl Into<String>) {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries().await;
        entries.push(LogEntry {
            timestamp: Utc::now(),
            kind,
            message: message.into(),
        });
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }
        match serde_json::to_vec(&entries) {
            Ok(raw) => self.collection.put(ENTRIES_KEY, &raw, None).await,
            Err(e) => debug!("Failed to encode diagnostics log: {}", e),
        }
    }

    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        self.collection.clear().await;
    }
}
