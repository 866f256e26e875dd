//! Static snapshot used when neither live nor cached data is available.

use crate::core::market::{MarketSnapshot, MetalPrice};
use chrono::Utc;
use std::collections::BTreeMap;

const DEMO_RATES: [(&str, f64); 8] = [
    ("PKR", 281.50),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("SAR", 3.75),
    ("AED", 3.67),
    ("JPY", 110.25),
    ("CAD", 1.25),
    ("AUD", 1.35),
];

pub fn demo_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        currency_rates: DEMO_RATES
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect::<BTreeMap<_, _>>(),
        gold: MetalPrice {
            price_per_tola: 185000.0,
            change_percent_24h: 0.75,
        },
        silver: MetalPrice {
            price_per_tola: 2180.0,
            change_percent_24h: -0.32,
        },
        timestamp: Utc::now(),
    }
}

/// Currency the demo metal prices are quoted in.
pub const DEMO_METAL_CURRENCY: &str = "PKR";

/// Demo snapshot with metal prices converted to `currency`, or `None` when
/// the demo rates have no entry for it.
pub fn demo_snapshot_in(currency: &str) -> Option<MarketSnapshot> {
    let mut snapshot = demo_snapshot();
    let factor = snapshot.rate(currency)? / snapshot.rate(DEMO_METAL_CURRENCY)?;
    snapshot.gold.price_per_tola *= factor;
    snapshot.silver.price_per_tola *= factor;
    Some(snapshot)
}
