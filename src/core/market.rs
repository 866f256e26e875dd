//! Market data abstractions and core types

use crate::core::error::FetchError;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Currency every rate in a snapshot is quoted against.
pub const PIVOT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metal {
    Gold,
    Silver,
}

impl Display for Metal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Metal::Gold => "Gold",
                Metal::Silver => "Silver",
            }
        )
    }
}

impl FromStr for Metal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gold" => Ok(Metal::Gold),
            "silver" => Ok(Metal::Silver),
            _ => Err(anyhow::anyhow!("Invalid metal: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetalPrice {
    pub price_per_tola: f64,
    pub change_percent_24h: f64,
}

/// A complete set of prices as returned by one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Units of each currency per one USD.
    pub currency_rates: BTreeMap<String, f64>,
    pub gold: MetalPrice,
    pub silver: MetalPrice,
    pub timestamp: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Rate per USD for `code`. USD itself is always 1.
    pub fn rate(&self, code: &str) -> Option<f64> {
        let code = code.to_uppercase();
        if code == PIVOT_CURRENCY {
            return Some(1.0);
        }
        self.currency_rates
            .get(&code)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    pub fn metal_price(&self, metal: Metal) -> &MetalPrice {
        match metal {
            Metal::Gold => &self.gold,
            Metal::Silver => &self.silver,
        }
    }
}

/// Where the snapshot in use came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Live,
    Cached { age: Duration },
    Demo,
}

impl Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Live => write!(f, "Live Data"),
            DataSource::Cached { age } => {
                let hours = age.num_minutes() as f64 / 60.0;
                write!(f, "Cached Data ({hours:.1} hours old)")
            }
            DataSource::Demo => write!(f, "Demo Mode"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient message for the user, raised while loading data.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub snapshot: MarketSnapshot,
    pub source: DataSource,
    pub notifications: Vec<Notification>,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot, FetchError>;
}
