//! Error types shared by the calculators and the market data fetcher.

use thiserror::Error;

/// Rejection of calculator input, raised before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("purity must be between 0 and 100 percent (got {0})")]
    InvalidPurity(f64),
    #[error("time period is shorter than one month")]
    PeriodTooShort,
    #[error("time period must not exceed {max_months} months (got {months})")]
    PeriodTooLong { months: f64, max_months: u32 },
    #[error("no exchange rate available for currency: {0}")]
    UnknownCurrency(String),
    #[error("current {0} price is not available")]
    MissingPrice(&'static str),
}

/// Failure of a single live market data request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },
    #[error("Invalid response format - expected JSON")]
    InvalidFormat,
    #[error("Failed to parse market data: {0}")]
    Parse(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Request error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Short user-facing explanation with a suggestion, used for notifications.
    pub fn user_message(&self) -> String {
        let (error_msg, suggestion) = match self {
            FetchError::Timeout => ("Request timed out", "Check your internet connection."),
            FetchError::Http { status: 404, .. } => (
                "Market data endpoint not found",
                "Verify the provider base_url in your config.",
            ),
            FetchError::Http { status: 403, .. } => {
                ("Access denied", "Check the market data endpoint permissions.")
            }
            _ => ("Unable to connect to data server", "Using cached data."),
        };
        format!("{error_msg}. {suggestion}")
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}
