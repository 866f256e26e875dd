//! Islamic (Mudarabah, simple profit) and conventional (monthly compound) savings.

use super::{non_negative, positive};
use crate::core::error::CalcError;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsMode {
    Islamic,
    Conventional,
}

impl Display for SavingsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SavingsMode::Islamic => "Islamic",
                SavingsMode::Conventional => "Conventional",
            }
        )
    }
}

impl FromStr for SavingsMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "islamic" | "mudarabah" => Ok(SavingsMode::Islamic),
            "conventional" | "compound" => Ok(SavingsMode::Conventional),
            _ => Err(anyhow!("Invalid savings mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsInput {
    pub principal: f64,
    pub monthly_deposit: f64,
    /// Annual rate in percent
    pub annual_rate: f64,
    pub years: f64,
    pub mode: SavingsMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsResult {
    pub months: u32,
    pub total_contributed: f64,
    pub total_profit: f64,
    pub final_balance: f64,
    /// Average yearly growth of the contributions, in percent
    pub effective_rate: f64,
}

/// Balance at the end of one year of the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub year: u32,
    pub months: u32,
    pub contributed: f64,
    pub profit: f64,
    pub balance: f64,
}

/// Longest supported plan: 100 years.
pub const MAX_MONTHS: u32 = 1200;

fn validate(input: &SavingsInput) -> Result<u32, CalcError> {
    positive("principal", input.principal)?;
    non_negative("monthly deposit", input.monthly_deposit)?;
    positive("profit rate", input.annual_rate)?;
    positive("years", input.years)?;

    let months = (input.years * 12.0).round();
    if months < 1.0 {
        return Err(CalcError::PeriodTooShort);
    }
    if months > MAX_MONTHS as f64 {
        return Err(CalcError::PeriodTooLong {
            months,
            max_months: MAX_MONTHS,
        });
    }
    Ok(months as u32)
}

/// Simple Mudarabah profit on `amount` held for `months`.
pub fn islamic_profit(amount: f64, annual_rate: f64, months: u32) -> f64 {
    amount * annual_rate * months as f64 / 1200.0
}

/// Contributions and profit after `months`, following the plan's mode.
fn position_after(input: &SavingsInput, months: u32) -> (f64, f64) {
    let contributed = input.principal + input.monthly_deposit * months as f64;

    let profit = match input.mode {
        SavingsMode::Islamic => {
            // deposit k earns for the remaining months - k + 1 months
            let deposits: f64 = (1..=months)
                .map(|k| islamic_profit(input.monthly_deposit, input.annual_rate, months - k + 1))
                .sum();
            islamic_profit(input.principal, input.annual_rate, months) + deposits
        }
        SavingsMode::Conventional => {
            let i = input.annual_rate / 1200.0;
            let growth = (1.0 + i).powi(months as i32);
            let annuity = if i == 0.0 {
                input.monthly_deposit * months as f64
            } else {
                input.monthly_deposit * (growth - 1.0) / i
            };
            input.principal * growth + annuity - contributed
        }
    };

    (contributed, profit)
}

pub fn calculate_savings(input: &SavingsInput) -> Result<SavingsResult, CalcError> {
    let months = validate(input)?;
    let (total_contributed, total_profit) = position_after(input, months);
    let final_balance = total_contributed + total_profit;

    Ok(SavingsResult {
        months,
        total_contributed,
        total_profit,
        final_balance,
        effective_rate: ((final_balance / total_contributed - 1.0) / input.years) * 100.0,
    })
}

/// Year-by-year balances. A partial last year is evaluated at the final month.
pub fn savings_schedule(input: &SavingsInput) -> Result<Vec<ScheduleRow>, CalcError> {
    let months = validate(input)?;
    let years = months.div_ceil(12);

    Ok((1..=years)
        .map(|year| {
            let at = (year * 12).min(months);
            let (contributed, profit) = position_after(input, at);
            ScheduleRow {
                year,
                months: at,
                contributed,
                profit,
                balance: contributed + profit,
            }
        })
        .collect())
}
