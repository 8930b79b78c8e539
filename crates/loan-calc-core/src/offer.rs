//! One-shot offer queries: price a loan, or size one from a payment.
//!
//! Unlike the edit session these clamp immediately, reporting every clamp as
//! a warning in the output envelope.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analytics::AnalyticsRecord;
use crate::category::CollateralCategory;
use crate::engine::{LoanEngine, OfferComparison};
use crate::state::LoanState;
use crate::types::{with_metadata, ComputationOutput, Money, Years};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteInput {
    #[serde(default)]
    pub category: CollateralCategory,
    pub principal: Money,
    pub term_years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteOutput {
    pub state: LoanState,
    pub offers: Vec<OfferComparison>,
    pub analytics: AnalyticsRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityInput {
    #[serde(default)]
    pub category: CollateralCategory,
    /// Payment the borrower can afford each month.
    pub installment: Money,
    pub term_years: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityOutput {
    pub state: LoanState,
    /// Principal the requested payment supports before the amount bounds apply.
    pub unconstrained_principal: Money,
    /// True when the amount bounds, not the payment, set the principal.
    pub principal_capped: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a principal and term, clamped into the category's bounds.
pub fn quote_offer(
    engine: &LoanEngine,
    input: &QuoteInput,
) -> LoanCalcResult<ComputationOutput<QuoteOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let raw = engine.quote(input.category, input.principal, input.term_years)?;
    let state = engine.commit_term_years(&engine.commit_principal(&raw)?)?;

    if state.principal() != input.principal {
        warnings.push(format!(
            "Principal {} outside {} bounds; clamped to {}",
            input.principal,
            input.category,
            state.principal()
        ));
    }
    if state.term_years() != input.term_years {
        warnings.push(format!(
            "Term {} years outside {} bounds; clamped to {}",
            input.term_years,
            input.category,
            state.term_years()
        ));
    }

    let output = QuoteOutput {
        offers: engine.compare_offers(&state)?,
        analytics: AnalyticsRecord::from_state(&state)?,
        state,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": engine.table().rate(input.category).to_string(),
        "periods_per_year": crate::annuity::PERIODS_PER_YEAR.to_string(),
    });

    Ok(with_metadata(
        "Level-payment annuity (forward)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Size the largest principal a monthly payment supports.
pub fn borrowing_capacity(
    engine: &LoanEngine,
    input: &CapacityInput,
) -> LoanCalcResult<ComputationOutput<CapacityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let term_years = engine.table().clamp_term(input.category, input.term_years);
    if term_years != input.term_years {
        warnings.push(format!(
            "Term {} years outside {} bounds; clamped to {}",
            input.term_years, input.category, term_years
        ));
    }

    let seed = engine.quote(input.category, Money::ZERO, term_years)?;
    let raw = engine.set_installment(&seed, input.installment)?;
    let state = engine.commit_installment(&raw)?;

    let payment_bounds = engine.config().payment_bounds;
    if !payment_bounds.contains(input.installment) {
        warnings.push(format!(
            "Installment {} outside [{}, {}]; clamped",
            input.installment, payment_bounds.min, payment_bounds.max
        ));
    }

    let unconstrained = engine.set_installment(&seed, payment_bounds.clamp(input.installment))?;
    let principal_capped = unconstrained.principal() != state.principal();
    if principal_capped {
        warnings.push(format!(
            "Supported principal {} outside {} bounds; capped at {} with installment {}",
            unconstrained.principal().round_dp(2),
            input.category,
            state.principal(),
            state.installment().round_dp(2)
        ));
    }

    let output = CapacityOutput {
        state,
        unconstrained_principal: unconstrained.principal(),
        principal_capped,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": engine.table().rate(input.category).to_string(),
        "payment_bounds": payment_bounds,
    });

    Ok(with_metadata(
        "Level-payment annuity (inverse)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
