//! Pure calculators. Inputs are validated up front; no I/O happens here.

pub mod currency;
pub mod metals;
pub mod mutual_fund;
pub mod savings;

use crate::core::error::CalcError;

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite { field })
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if finite(field, value)? <= 0.0 {
        return Err(CalcError::NotPositive { field, value });
    }
    Ok(value)
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if finite(field, value)? < 0.0 {
        return Err(CalcError::Negative { field, value });
    }
    Ok(value)
}

/// `part / whole` as a percentage, `None` when `whole` is zero.
pub(crate) fn percent_of(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        None
    } else {
        Some(part / whole * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_helpers() {
        assert_eq!(positive("amount", 1.5), Ok(1.5));
        assert!(matches!(
            positive("amount", 0.0),
            Err(CalcError::NotPositive { field: "amount", .. })
        ));
        assert_eq!(non_negative("deposit", 0.0), Ok(0.0));
        assert!(matches!(
            non_negative("deposit", -1.0),
            Err(CalcError::Negative { .. })
        ));
        assert_eq!(
            positive("rate", f64::NAN),
            Err(CalcError::NotFinite { field: "rate" })
        );
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(25.0, 200.0), Some(12.5));
        assert_eq!(percent_of(25.0, 0.0), None);
    }
}
