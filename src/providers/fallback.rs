//! Live fetch with retry, falling back to the cached snapshot and then demo data.

use crate::core::cache::KeyValueCollection;
use crate::core::diagnostics::{DiagnosticsLog, EntryKind};
use crate::core::market::{
    DataSource, LoadedSnapshot, MarketDataProvider, MarketSnapshot, Notification,
    NotificationLevel,
};
use crate::providers::demo::{DEMO_METAL_CURRENCY, demo_snapshot, demo_snapshot_in};
use crate::providers::util::{RetryPolicy, with_retry};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

const LATEST_KEY: &[u8] = b"latest";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSnapshot {
    snapshot: MarketSnapshot,
    fetched_at: DateTime<Utc>,
}

pub struct MarketDataService {
    /// `None` when no endpoint is configured.
    provider: Option<Arc<dyn MarketDataProvider>>,
    snapshots: Arc<dyn KeyValueCollection>,
    diagnostics: Option<Arc<DiagnosticsLog>>,
    retry: RetryPolicy,
    max_age: Duration,
    offline: bool,
    /// Currency metal prices are shown in
    currency: String,
}

impl MarketDataService {
    pub fn new(
        provider: Option<Arc<dyn MarketDataProvider>>,
        snapshots: Arc<dyn KeyValueCollection>,
    ) -> Self {
        Self {
            provider,
            snapshots,
            diagnostics: None,
            retry: RetryPolicy::default(),
            max_age: Duration::hours(24),
            offline: false,
            currency: DEMO_METAL_CURRENCY.to_string(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<DiagnosticsLog>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_uppercase();
        self
    }

    /// Always yields a usable snapshot; failures become notifications.
    /// Every notification is also written to the diagnostics log.
    pub async fn load(&self) -> LoadedSnapshot {
        let loaded = self.resolve().await;
        if let Some(diagnostics) = &self.diagnostics {
            for notification in &loaded.notifications {
                diagnostics
                    .record(notification.level.into(), notification.message.clone())
                    .await;
            }
        }
        loaded
    }

    async fn resolve(&self) -> LoadedSnapshot {
        let mut notifications = Vec::new();

        let Some(provider) = &self.provider else {
            debug!("No market data endpoint configured");
            return self.demo(notifications, "No market data endpoint configured. Using demo data.");
        };

        if self.offline {
            notifications.push(Notification::new(
                NotificationLevel::Warning,
                "Offline mode - using cached data",
            ));
            return self.from_cache_or_demo(notifications).await;
        }

        let mut failures = Vec::new();
        let result = with_retry(
            || provider.fetch_snapshot(),
            &self.retry,
            |attempt, err| {
                warn!("Market data attempt {} failed: {}", attempt, err);
                failures.push(format!("attempt {attempt}: {err}"));
            },
        )
        .await;

        if let Some(diagnostics) = &self.diagnostics {
            for failure in failures {
                diagnostics.record(EntryKind::ApiError, failure).await;
            }
        }

        match result {
            Ok(snapshot) => {
                self.store(&snapshot, Utc::now()).await;
                info!("Live market data loaded");
                notifications.push(Notification::new(
                    NotificationLevel::Success,
                    "Live data loaded successfully!",
                ));
                LoadedSnapshot {
                    snapshot,
                    source: DataSource::Live,
                    notifications,
                }
            }
            Err(err) => {
                notifications.push(Notification::new(
                    NotificationLevel::Warning,
                    err.user_message(),
                ));
                self.from_cache_or_demo(notifications).await
            }
        }
    }

    /// Saves `snapshot` as the latest known good one.
    pub async fn store(&self, snapshot: &MarketSnapshot, fetched_at: DateTime<Utc>) {
        let stored = StoredSnapshot {
            snapshot: snapshot.clone(),
            fetched_at,
        };
        match serde_json::to_vec(&stored) {
            Ok(raw) => self.snapshots.put(LATEST_KEY, &raw, None).await,
            Err(e) => warn!("Failed to encode snapshot for caching: {}", e),
        }
    }

    /// The cached snapshot and its age, if it is younger than the max age.
    pub async fn cached(&self) -> Option<(MarketSnapshot, Duration)> {
        let raw = self.snapshots.get(LATEST_KEY).await?;
        let stored: StoredSnapshot = match serde_json::from_slice(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                debug!("Dropping unreadable cached snapshot: {}", e);
                self.snapshots.remove(LATEST_KEY).await;
                return None;
            }
        };

        let age = Utc::now() - stored.fetched_at;
        if age >= self.max_age {
            debug!("Cached snapshot is {} minutes old, ignoring", age.num_minutes());
            return None;
        }
        Some((stored.snapshot, age.max(Duration::zero())))
    }

    async fn from_cache_or_demo(&self, mut notifications: Vec<Notification>) -> LoadedSnapshot {
        if let Some((snapshot, age)) = self.cached().await {
            let hours = age.num_minutes() as f64 / 60.0;
            notifications.push(Notification::new(
                NotificationLevel::Info,
                format!("Using cached data ({hours:.1} hours old)"),
            ));
            return LoadedSnapshot {
                snapshot,
                source: DataSource::Cached { age },
                notifications,
            };
        }
        self.demo(notifications, "Using demo data. Live market data is unavailable.")
    }

    fn demo(&self, mut notifications: Vec<Notification>, message: &str) -> LoadedSnapshot {
        notifications.push(Notification::new(NotificationLevel::Info, message));
        let snapshot = demo_snapshot_in(&self.currency).unwrap_or_else(|| {
            notifications.push(Notification::new(
                NotificationLevel::Info,
                format!("Demo metal prices are quoted in {DEMO_METAL_CURRENCY}"),
            ));
            demo_snapshot()
        });
        LoadedSnapshot {
            snapshot,
            source: DataSource::Demo,
            notifications,
        }
    }
}
