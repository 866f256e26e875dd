use super::savings::MAX_MONTHS;
use super::{non_negative, percent_of, positive};
use crate::core::error::CalcError;
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutualFundInput {
    /// Lump sum invested at the start
    pub amount: f64,
    pub nav: f64,
    /// Expected annual return in percent
    pub expected_return: f64,
    pub years: f64,
    pub monthly_sip: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutualFundProjection {
    pub initial_units: f64,
    pub sip_units: f64,
    pub total_units: f64,
    pub total_investment: f64,
    pub projected_nav: f64,
    pub projected_value: f64,
    pub gain: f64,
    pub total_return_percent: Option<f64>,
    /// CAGR of the total investment, in percent
    pub annualized_return: Option<f64>,
}

pub fn project_mutual_fund(input: &MutualFundInput) -> Result<MutualFundProjection, CalcError> {
    positive("investment amount", input.amount)?;
    positive("NAV", input.nav)?;
    positive("expected return", input.expected_return)?;
    positive("years", input.years)?;
    let sip = non_negative("monthly SIP", input.monthly_sip.unwrap_or(0.0))?;

    let growth = 1.0 + input.expected_return / 100.0;
    let initial_units = input.amount / input.nav;
    let projected_nav = input.nav * growth.powf(input.years);

    let mut sip_units = 0.0;
    let mut total_investment = input.amount;
    if sip > 0.0 {
        let months = (input.years * 12.0).round();
        if months > MAX_MONTHS as f64 {
            return Err(CalcError::PeriodTooLong {
                months,
                max_months: MAX_MONTHS,
            });
        }
        for month in 1..=months as u32 {
            let nav_at = input.nav * growth.powf(month as f64 / 12.0);
            sip_units += sip / nav_at;
            total_investment += sip;
        }
    }

    let total_units = initial_units + sip_units;
    let projected_value = total_units * projected_nav;
    let gain = projected_value - total_investment;

    Ok(MutualFundProjection {
        initial_units,
        sip_units,
        total_units,
        total_investment,
        projected_nav,
        projected_value,
        gain,
        total_return_percent: percent_of(gain, total_investment),
        annualized_return: annualized_return(total_investment, projected_value, input.years),
    })
}

fn annualized_return(begin: f64, end: f64, years: f64) -> Option<f64> {
    let begin_bal = Decimal::from_f64(begin)?;
    let end_bal = Decimal::from_f64(end)?;
    let n_years = Decimal::from_f64(years)?;
    if begin_bal.is_zero() || n_years.is_zero() {
        return None;
    }

    let rate = cagr(begin_bal, end_bal, n_years);
    let percentage = (rate * Decimal::from(100)).to_f64();
    debug!("CAGR over {years} years: {percentage:?}%");
    percentage
}
