//! Conversion of raw presentation-layer numbers into decimals.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::LoanCalcError;
use crate::LoanCalcResult;

/// Convert a raw `f64` edit into a `Decimal`, rejecting NaN, infinities and
/// magnitudes outside decimal range.
pub fn decimal_from_f64(field: &str, value: f64) -> LoanCalcResult<Decimal> {
    if !value.is_finite() {
        return Err(LoanCalcError::numeric(
            field,
            format!("Value must be finite, got {value}"),
        ));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| LoanCalcError::numeric(field, format!("{value} is outside decimal range")))
}
