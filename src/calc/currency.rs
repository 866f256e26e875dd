use super::{percent_of, positive};
use crate::core::error::CalcError;
use crate::core::market::MarketSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted: f64,
    /// Units of `to` per one unit of `from`
    pub rate: f64,
}

fn lookup(code: &str, snapshot: &MarketSnapshot) -> Result<f64, CalcError> {
    snapshot
        .rate(code)
        .ok_or_else(|| CalcError::UnknownCurrency(code.to_string()))
}

/// Units of `quote` per one unit of `base`, through the USD pivot.
pub fn cross_rate(base: &str, quote: &str, snapshot: &MarketSnapshot) -> Result<f64, CalcError> {
    let base = base.to_uppercase();
    let quote = quote.to_uppercase();
    if base == quote {
        return Ok(1.0);
    }
    Ok(lookup(&quote, snapshot)? / lookup(&base, snapshot)?)
}

pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
    snapshot: &MarketSnapshot,
) -> Result<ConversionResult, CalcError> {
    positive("amount", amount)?;
    let from = from.to_uppercase();
    let to = to.to_uppercase();

    let (converted, rate) = if from == to {
        (amount, 1.0)
    } else {
        let from_rate = lookup(&from, snapshot)?;
        let to_rate = lookup(&to, snapshot)?;
        // USD has rate 1, so this also covers conversions to and from the pivot
        (amount / from_rate * to_rate, to_rate / from_rate)
    };

    Ok(ConversionResult {
        amount,
        from,
        to,
        converted,
        rate,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyInvestmentInput {
    /// Local currency spent
    pub amount: f64,
    pub currency: String,
    /// Local currency per unit of `currency` at purchase
    pub purchase_rate: f64,
    pub current_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyInvestmentResult {
    pub currency: String,
    pub units: f64,
    pub current_value: f64,
    pub gain_loss: f64,
    pub return_percent: Option<f64>,
}

pub fn calculate_currency_investment(
    input: &CurrencyInvestmentInput,
) -> Result<CurrencyInvestmentResult, CalcError> {
    positive("amount", input.amount)?;
    positive("purchase rate", input.purchase_rate)?;
    positive("current rate", input.current_rate)?;

    let units = input.amount / input.purchase_rate;
    let current_value = units * input.current_rate;
    let gain_loss = current_value - input.amount;

    Ok(CurrencyInvestmentResult {
        currency: input.currency.to_uppercase(),
        units,
        current_value,
        gain_loss,
        return_percent: percent_of(gain_loss, input.amount),
    })
}
