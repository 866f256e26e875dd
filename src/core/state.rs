use crate::core::market::{LoadedSnapshot, MarketSnapshot};

/// Per-run application state handed to the commands.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Local currency metal prices are quoted in
    pub currency: String,
    market: Option<LoadedSnapshot>,
}

impl AppState {
    pub fn new(currency: &str) -> Self {
        Self {
            currency: currency.to_uppercase(),
            market: None,
        }
    }

    /// Replaces the current market data wholesale.
    pub fn set_market(&mut self, loaded: LoadedSnapshot) {
        self.market = Some(loaded);
    }

    pub fn market(&self) -> Option<&LoadedSnapshot> {
        self.market.as_ref()
    }

    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        self.market.as_ref().map(|loaded| &loaded.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::DataSource;
    use crate::providers::demo::demo_snapshot;

    #[test]
    fn test_market_is_replaced() {
        let mut state = AppState::new("pkr");
        assert_eq!(state.currency, "PKR");
        assert!(state.snapshot().is_none());

        state.set_market(LoadedSnapshot {
            snapshot: demo_snapshot(),
            source: DataSource::Demo,
            notifications: Vec::new(),
        });
        let mut live = demo_snapshot();
        live.gold.price_per_tola = 1.0;
        state.set_market(LoadedSnapshot {
            snapshot: live,
            source: DataSource::Live,
            notifications: Vec::new(),
        });

        assert_eq!(state.market().unwrap().source, DataSource::Live);
        assert_eq!(state.snapshot().unwrap().gold.price_per_tola, 1.0);
    }
}
