use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tola::calc::metals::{MetalInput, Purity, WeightUnit};
use tola::calc::mutual_fund::MutualFundInput;
use tola::calc::savings::{SavingsInput, SavingsMode};
use tola::core::log::init_logging;
use tola::core::market::Metal;
use tola::{AppCommand, RunOptions};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Do not contact the market data endpoint
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ExportArgs {
    /// Write results to a .json or .csv file
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show currency rates and gold/silver prices
    Rates,
    /// Compare Islamic (Mudarabah) and conventional savings growth
    Savings {
        #[arg(long)]
        principal: f64,
        #[arg(long, default_value_t = 0.0)]
        monthly_deposit: f64,
        /// Annual profit rate in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: f64,
        /// islamic or conventional
        #[arg(long, default_value = "islamic")]
        mode: SavingsMode,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Value gold or silver holdings at current prices
    Metal {
        /// gold or silver
        #[arg(long, default_value = "gold")]
        metal: Metal,
        #[arg(long)]
        quantity: f64,
        /// tola, gram, ounce or kg
        #[arg(long, default_value = "tola")]
        unit: WeightUnit,
        /// Price paid per unit
        #[arg(long)]
        purchase_price: f64,
        /// Percent (e.g. 91.67) or karat (e.g. 22k)
        #[arg(long, default_value = "24k")]
        purity: Purity,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Track a foreign currency holding
    CurrencyInvestment {
        /// Local currency amount invested
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        currency: String,
        /// Local currency per unit when bought
        #[arg(long)]
        purchase_rate: f64,
        /// Local currency per unit now; taken from market data if omitted
        #[arg(long)]
        current_rate: Option<f64>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Project a mutual fund investment with optional monthly SIP
    MutualFund {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        nav: f64,
        /// Expected annual return in percent
        #[arg(long)]
        expected_return: f64,
        #[arg(long)]
        years: f64,
        #[arg(long)]
        monthly_sip: Option<f64>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Show recorded errors and market data events
    Logs {
        /// Remove all recorded entries
        #[arg(long, conflicts_with = "export")]
        clear: bool,
        #[command(flatten)]
        export: ExportArgs,
    },
}

impl Commands {
    fn into_app_command(self) -> (AppCommand, Option<PathBuf>) {
        match self {
            Commands::Setup => unreachable!("Setup command should be handled separately"),
            Commands::Rates => (AppCommand::Rates, None),
            Commands::Savings {
                principal,
                monthly_deposit,
                rate,
                years,
                mode,
                export,
            } => (
                AppCommand::Savings(SavingsInput {
                    principal,
                    monthly_deposit,
                    annual_rate: rate,
                    years,
                    mode,
                }),
                export.export,
            ),
            Commands::Metal {
                metal,
                quantity,
                unit,
                purchase_price,
                purity,
                export,
            } => (
                AppCommand::Metal(MetalInput {
                    metal,
                    quantity,
                    unit,
                    purchase_price,
                    purity,
                }),
                export.export,
            ),
            Commands::Convert {
                amount,
                from,
                to,
                export,
            } => (AppCommand::Convert { amount, from, to }, export.export),
            Commands::CurrencyInvestment {
                amount,
                currency,
                purchase_rate,
                current_rate,
                export,
            } => (
                AppCommand::CurrencyInvestment {
                    amount,
                    currency,
                    purchase_rate,
                    current_rate,
                },
                export.export,
            ),
            Commands::MutualFund {
                amount,
                nav,
                expected_return,
                years,
                monthly_sip,
                export,
            } => (
                AppCommand::MutualFund(MutualFundInput {
                    amount,
                    nav,
                    expected_return,
                    years,
                    monthly_sip,
                }),
                export.export,
            ),
            Commands::Logs { clear, export } => (AppCommand::Logs { clear }, export.export),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => tola::cli::setup::setup(),
        Some(cmd) => {
            let (command, export) = cmd.into_app_command();
            let options = RunOptions {
                config_path: cli.config_path,
                offline: cli.offline,
                export,
            };
            tola::run_command(command, &options).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
