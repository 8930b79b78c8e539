//! Level-payment annuity math for a fully amortizing loan.
//!
//! The forward direction answers "what would I pay" for a principal and term;
//! the inverse answers "how much can I borrow" for a payment and term. Both
//! share the same discount complement `1 - (1 + r)^-n`, so applying one after
//! the other is exact up to decimal rounding.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Rate, Years};
use crate::LoanCalcResult;

/// Monthly compounding.
pub const PERIODS_PER_YEAR: Decimal = dec!(12);

/// Annual rate converted to the per-period rate.
pub fn periodic_rate(annual_rate: Rate) -> Rate {
    annual_rate / PERIODS_PER_YEAR
}

/// Number of payment periods in a term. Fractional terms give fractional periods.
pub fn total_periods(term_years: Years) -> LoanCalcResult<Decimal> {
    if term_years <= Decimal::ZERO {
        return Err(LoanCalcError::numeric(
            "term_years",
            format!("Term must resolve to a positive number of periods, got {term_years}"),
        ));
    }
    term_years
        .checked_mul(PERIODS_PER_YEAR)
        .ok_or_else(|| LoanCalcError::numeric("term_years", "Term exceeds decimal range"))
}

/// `1 - (1 + r)^-n`
fn discount_complement(rate: Rate, periods: Decimal) -> LoanCalcResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(LoanCalcError::numeric(
            "annual_rate",
            "Periodic rate must be greater than -100%",
        ));
    }

    let growth = match (Decimal::ONE + rate).checked_powd(periods) {
        Some(growth) => growth,
        // (1 + r)^-n is below the smallest representable decimal.
        None if rate > Decimal::ZERO => return Ok(Decimal::ONE),
        None => {
            return Err(LoanCalcError::numeric(
                "term_years",
                "Compounding factor exceeds decimal range",
            ))
        }
    };

    if growth.is_zero() {
        return Err(LoanCalcError::DivisionByZero {
            context: "annuity compounding factor".into(),
        });
    }

    let complement = Decimal::ONE - Decimal::ONE / growth;
    if complement.is_zero() {
        return Err(LoanCalcError::DivisionByZero {
            context: "annuity discount complement".into(),
        });
    }

    Ok(complement)
}

/// Periodic installment for a principal (forward formula).
///
/// `installment = r * P / (1 - (1 + r)^-n)`, or `P / n` when the rate is zero.
pub fn installment(principal: Money, annual_rate: Rate, term_years: Years) -> LoanCalcResult<Money> {
    let periods = total_periods(term_years)?;
    let rate = periodic_rate(annual_rate);

    if rate.is_zero() {
        return principal
            .checked_div(periods)
            .ok_or_else(|| LoanCalcError::numeric("principal", "Installment exceeds decimal range"));
    }

    let complement = discount_complement(rate, periods)?;
    rate.checked_mul(principal)
        .and_then(|interest| interest.checked_div(complement))
        .ok_or_else(|| LoanCalcError::numeric("principal", "Installment exceeds decimal range"))
}

/// Principal supported by a periodic installment (inverse formula).
///
/// `P = installment * (1 - (1 + r)^-n) / r`, or `installment * n` when the rate is zero.
pub fn principal(installment: Money, annual_rate: Rate, term_years: Years) -> LoanCalcResult<Money> {
    let periods = total_periods(term_years)?;
    let rate = periodic_rate(annual_rate);

    if rate.is_zero() {
        return installment
            .checked_mul(periods)
            .ok_or_else(|| LoanCalcError::numeric("installment", "Principal exceeds decimal range"));
    }

    let complement = discount_complement(rate, periods)?;
    installment
        .checked_mul(complement)
        .and_then(|scaled| scaled.checked_div(rate))
        .ok_or_else(|| LoanCalcError::numeric("installment", "Principal exceeds decimal range"))
}
