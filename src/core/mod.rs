//! Core types shared across calculators, providers and the CLI

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod log;
pub mod market;
pub mod report;
pub mod state;

pub use error::{CalcError, FetchError};
pub use market::{DataSource, LoadedSnapshot, MarketDataProvider, MarketSnapshot, Metal};
