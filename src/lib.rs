pub mod calc;
pub mod cli;
pub mod core;
pub mod export;
pub mod providers;
pub mod store;

use crate::calc::currency::{
    CurrencyInvestmentInput, calculate_currency_investment, convert, cross_rate,
};
use crate::calc::metals::{MetalInput, value_metal};
use crate::calc::mutual_fund::{MutualFundInput, project_mutual_fund};
use crate::calc::savings::{SavingsInput, calculate_savings, savings_schedule};
use crate::core::cache::KeyValueCollection;
use crate::core::config::AppConfig;
use crate::core::diagnostics::{DiagnosticsLog, EntryKind};
use crate::core::market::{LoadedSnapshot, MarketDataProvider};
use crate::core::report::CalculationReport;
use crate::core::state::AppState;
use crate::providers::{MarketApiProvider, MarketDataService};
use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

pub enum AppCommand {
    Rates,
    Savings(SavingsInput),
    Metal(MetalInput),
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    CurrencyInvestment {
        amount: f64,
        currency: String,
        purchase_rate: f64,
        /// Taken from market data when omitted
        current_rate: Option<f64>,
    },
    MutualFund(MutualFundInput),
    Logs {
        clear: bool,
    },
}

#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub config_path: Option<String>,
    /// Forces offline mode regardless of the config
    pub offline: bool,
    pub export: Option<PathBuf>,
}

pub const SNAPSHOTS_COLLECTION: &str = "snapshots";
pub const DIAGNOSTICS_COLLECTION: &str = "diagnostics";

struct App {
    config: AppConfig,
    store: KeyValueStore,
    diagnostics: Arc<DiagnosticsLog>,
}

impl App {
    fn new(options: &RunOptions) -> Result<Self> {
        let mut config = match &options.config_path {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load()?,
        };
        config.offline |= options.offline;
        debug!("Loaded config: {config:#?}");

        let data_path = config.default_data_path()?;
        let store = KeyValueStore::open(&data_path);
        let diagnostics = Arc::new(DiagnosticsLog::new(
            store.collection_or_memory(DIAGNOSTICS_COLLECTION),
        ));

        Ok(Self {
            config,
            store,
            diagnostics,
        })
    }

    fn market_service(&self) -> Result<MarketDataService> {
        let base_url = self.config.provider.base_url.trim();
        let provider: Option<Arc<dyn MarketDataProvider>> = if base_url.is_empty() {
            None
        } else {
            Some(Arc::new(MarketApiProvider::new(base_url, self.config.timeout())?))
        };
        let snapshots: Arc<dyn KeyValueCollection> =
            self.store.collection_or_memory(SNAPSHOTS_COLLECTION);

        Ok(MarketDataService::new(provider, snapshots)
            .with_retry_policy(self.config.retry.policy())
            .with_max_age(self.config.cache_max_age())
            .with_diagnostics(Arc::clone(&self.diagnostics))
            .offline(self.config.offline)
            .with_currency(&self.config.currency))
    }

    async fn load_market(&self, state: &mut AppState) -> Result<()> {
        let service = self.market_service()?;
        let spinner = cli::ui::new_spinner("Loading market data...");
        let loaded: LoadedSnapshot = service.load().await;
        spinner.finish_and_clear();

        for notification in &loaded.notifications {
            cli::ui::print_notification(notification);
        }
        info!("Market data source: {}", loaded.source);
        state.set_market(loaded);
        Ok(())
    }
}

fn export_if_requested(
    options: &RunOptions,
    build: impl FnOnce() -> Result<CalculationReport>,
) -> Result<()> {
    if let Some(path) = &options.export {
        export::export_report(&build()?, path)?;
        println!("Exported results to {}", path.display());
    }
    Ok(())
}

pub async fn run_command(command: AppCommand, options: &RunOptions) -> Result<()> {
    info!("tola starting...");
    let app = App::new(options)?;

    let result = execute(&app, command, options).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
        app.diagnostics
            .record(EntryKind::GlobalError, format!("{e:#}"))
            .await;
    }
    result
}

async fn execute(app: &App, command: AppCommand, options: &RunOptions) -> Result<()> {
    let mut state = AppState::new(&app.config.currency);
    let currency = state.currency.clone();

    match command {
        AppCommand::Rates => {
            app.load_market(&mut state).await?;
            if let Some(loaded) = state.market() {
                cli::rates::display_dashboard(loaded, &currency);
            }
        }
        AppCommand::Savings(input) => {
            let result = calculate_savings(&input)?;
            let schedule = savings_schedule(&input)?;
            cli::savings::display_savings(&input, &result, &schedule, &currency);
            export_if_requested(options, || {
                CalculationReport::new("savings", &input, &result)?
                    .with_result("schedule", &schedule)
            })?;
        }
        AppCommand::Metal(input) => {
            app.load_market(&mut state).await?;
            let snapshot = state
                .snapshot()
                .context("Market data is not available")?;
            let valuation = value_metal(&input, snapshot)?;
            cli::metals::display_valuation(&input, &valuation, &currency);
            export_if_requested(options, || CalculationReport::new("metal", &input, &valuation))?;
        }
        AppCommand::Convert { amount, from, to } => {
            app.load_market(&mut state).await?;
            let snapshot = state
                .snapshot()
                .context("Market data is not available")?;
            let result = convert(amount, &from, &to, snapshot)?;
            cli::currency::display_conversion(&result);
            export_if_requested(options, || {
                let inputs = serde_json::json!({ "amount": amount, "from": from, "to": to });
                CalculationReport::new("convert", &inputs, &result)
            })?;
        }
        AppCommand::CurrencyInvestment {
            amount,
            currency: foreign,
            purchase_rate,
            current_rate,
        } => {
            let current_rate = match current_rate {
                Some(rate) => rate,
                None => {
                    app.load_market(&mut state).await?;
                    let snapshot = state
                        .snapshot()
                        .context("Market data is not available")?;
                    cross_rate(&foreign, &currency, snapshot)?
                }
            };
            let input = CurrencyInvestmentInput {
                amount,
                currency: foreign,
                purchase_rate,
                current_rate,
            };
            let result = calculate_currency_investment(&input)?;
            cli::currency::display_investment(&result, amount, &currency);
            export_if_requested(options, || {
                CalculationReport::new("currency-investment", &input, &result)
            })?;
        }
        AppCommand::MutualFund(input) => {
            let projection = project_mutual_fund(&input)?;
            cli::mutual_fund::display_projection(&input, &projection, &currency);
            export_if_requested(options, || {
                CalculationReport::new("mutual-fund", &input, &projection)
            })?;
        }
        AppCommand::Logs { clear } => {
            if clear {
                app.diagnostics.clear().await;
                println!("Diagnostic log cleared.");
            } else {
                let entries = app.diagnostics.entries().await;
                cli::logs::display_entries(&entries);
                if let Some(path) = &options.export {
                    export::export_logs(&entries, path)?;
                    println!("Exported diagnostic log to {}", path.display());
                }
            }
        }
    }
    Ok(())
}
