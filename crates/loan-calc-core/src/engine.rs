//! Loan parameter reconciliation.
//!
//! Principal, term and installment are tied together by the annuity formula
//! at the rate of the selected collateral category. Each operation takes the
//! current [`LoanState`] and returns the next one; an `Err` rejects the edit
//! and the caller keeps the state it already has.
//!
//! Edits come in two phases. `set_*` stores the raw value as typed, even when
//! it lies outside the category's bounds, and re-derives the dependent
//! quantity. `commit_*` runs when editing settles and clamps the field back
//! into bounds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annuity;
use crate::category::{CategoryTable, CategoryTerms, CollateralCategory};
use crate::config::{EngineConfig, SessionDefaults};
use crate::state::LoanState;
use crate::types::{Money, Rate, Years};
use crate::LoanCalcResult;

/// The category every comparison is measured against.
pub const BASELINE_CATEGORY: CollateralCategory = CollateralCategory::Unsecured;

/// How one category would price the current principal and term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferComparison {
    pub category: CollateralCategory,
    pub annual_rate: Rate,
    pub installment: Money,
    /// Baseline installment minus this one. Positive means cheaper.
    pub saving_vs_baseline: Money,
    /// Whether the current principal and term are inside this category's bounds.
    pub within_bounds: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LoanEngine {
    config: EngineConfig,
}

impl LoanEngine {
    pub fn new(config: EngineConfig) -> LoanCalcResult<Self> {
        config.validate()?;
        Ok(LoanEngine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &CategoryTable {
        &self.config.categories
    }

    fn terms(&self, category: CollateralCategory) -> &CategoryTerms {
        self.config.categories.terms(category)
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Initial session state from the configured defaults.
    pub fn open(&self) -> LoanCalcResult<LoanState> {
        self.open_with(&self.config.defaults)
    }

    /// Initial session state: the term is clamped into the category's bounds
    /// and the principal is derived from the seed installment.
    pub fn open_with(&self, defaults: &SessionDefaults) -> LoanCalcResult<LoanState> {
        let terms = self.terms(defaults.category);
        let term_years = terms.term_bounds.clamp(defaults.term_years);
        let principal =
            annuity::principal(defaults.seed_installment, terms.annual_rate, term_years)?;

        let state = LoanState::new(
            defaults.category,
            principal,
            term_years,
            defaults.seed_installment,
        );
        self.commit_principal(&state)
    }

    /// Price a principal and term under a category without clamping either.
    pub fn quote(
        &self,
        category: CollateralCategory,
        principal: Money,
        term_years: Years,
    ) -> LoanCalcResult<LoanState> {
        let installment = annuity::installment(principal, self.terms(category).annual_rate, term_years)?;
        Ok(LoanState::new(category, principal, term_years, installment))
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Switch category. Principal and term are authoritative: both are clamped
    /// into the new bounds and the installment is re-derived from them.
    pub fn set_category(
        &self,
        state: &LoanState,
        category: CollateralCategory,
    ) -> LoanCalcResult<LoanState> {
        let terms = self.terms(category);
        let principal = terms.amount_bounds.clamp(state.principal());
        let term_years = terms.term_bounds.clamp(state.term_years());

        if principal != state.principal() {
            debug!(%category, from = %state.principal(), to = %principal, "principal clamped on category switch");
        }
        if term_years != state.term_years() {
            debug!(%category, from = %state.term_years(), to = %term_years, "term clamped on category switch");
        }

        let installment = annuity::installment(principal, terms.annual_rate, term_years)?;
        Ok(LoanState::new(category, principal, term_years, installment))
    }

    /// Store a raw principal and re-derive the installment.
    pub fn set_principal(&self, state: &LoanState, principal: Money) -> LoanCalcResult<LoanState> {
        let installment = annuity::installment(
            principal,
            self.terms(state.category()).annual_rate,
            state.term_years(),
        )?;
        Ok(state.with_principal(principal).with_installment(installment))
    }

    /// Store a raw term and re-derive the installment.
    pub fn set_term_years(&self, state: &LoanState, term_years: Years) -> LoanCalcResult<LoanState> {
        let installment = annuity::installment(
            state.principal(),
            self.terms(state.category()).annual_rate,
            term_years,
        )?;
        Ok(state.with_term_years(term_years).with_installment(installment))
    }

    /// Store a raw installment and re-derive the principal it supports.
    pub fn set_installment(&self, state: &LoanState, installment: Money) -> LoanCalcResult<LoanState> {
        let principal = annuity::principal(
            installment,
            self.terms(state.category()).annual_rate,
            state.term_years(),
        )?;
        Ok(state.with_installment(installment).with_principal(principal))
    }

    // -----------------------------------------------------------------------
    // Commits
    // -----------------------------------------------------------------------

    /// Clamp the principal into the category's amount bounds.
    pub fn commit_principal(&self, state: &LoanState) -> LoanCalcResult<LoanState> {
        let principal = self.table().clamp_principal(state.category(), state.principal());
        if principal == state.principal() {
            return Ok(*state);
        }
        debug!(category = %state.category(), from = %state.principal(), to = %principal, "principal clamped on commit");
        self.set_principal(state, principal)
    }

    /// Clamp the term into the category's term bounds.
    pub fn commit_term_years(&self, state: &LoanState) -> LoanCalcResult<LoanState> {
        let term_years = self.table().clamp_term(state.category(), state.term_years());
        if term_years == state.term_years() {
            return Ok(*state);
        }
        debug!(category = %state.category(), from = %state.term_years(), to = %term_years, "term clamped on commit");
        self.set_term_years(state, term_years)
    }

    /// Clamp the installment into the payment bounds and re-derive the
    /// principal. The amount bounds take precedence: if the derived principal
    /// leaves them, it is clamped and the installment follows.
    pub fn commit_installment(&self, state: &LoanState) -> LoanCalcResult<LoanState> {
        let installment = self.config.payment_bounds.clamp(state.installment());
        let next = if installment == state.installment() {
            *state
        } else {
            debug!(from = %state.installment(), to = %installment, "installment clamped on commit");
            self.set_installment(state, installment)?
        };
        self.commit_principal(&next)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Installment under `from` minus installment under `to`, for the same
    /// principal and term. Positive when switching to `to` is cheaper.
    pub fn comparative_saving(
        &self,
        state: &LoanState,
        from: CollateralCategory,
        to: CollateralCategory,
    ) -> LoanCalcResult<Money> {
        let from_installment =
            annuity::installment(state.principal(), self.terms(from).annual_rate, state.term_years())?;
        let to_installment =
            annuity::installment(state.principal(), self.terms(to).annual_rate, state.term_years())?;
        Ok(from_installment - to_installment)
    }

    /// Price the current principal and term under every category.
    pub fn compare_offers(&self, state: &LoanState) -> LoanCalcResult<Vec<OfferComparison>> {
        let baseline = annuity::installment(
            state.principal(),
            self.terms(BASELINE_CATEGORY).annual_rate,
            state.term_years(),
        )?;

        CollateralCategory::ALL
            .iter()
            .map(|&category| {
                let terms = self.terms(category);
                let installment =
                    annuity::installment(state.principal(), terms.annual_rate, state.term_years())?;
                Ok(OfferComparison {
                    category,
                    annual_rate: terms.annual_rate,
                    installment,
                    saving_vs_baseline: baseline - installment,
                    within_bounds: terms.amount_bounds.contains(state.principal())
                        && terms.term_bounds.contains(state.term_years()),
                })
            })
            .collect()
    }

    /// Whether principal and term sit inside the current category's bounds.
    pub fn is_settled(&self, state: &LoanState) -> bool {
        let terms = self.terms(state.category());
        terms.amount_bounds.contains(state.principal())
            && terms.term_bounds.contains(state.term_years())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_derives_principal_from_seed() {
        let engine = LoanEngine::default();
        let state = engine.open().unwrap();
        assert_eq!(state.category(), CollateralCategory::Unsecured);
        // Requested 10 years, Unsecured allows at most 5
        assert_eq!(state.term_years(), dec!(5));
        assert_eq!(state.installment(), dec!(15_000));
        let back = annuity::installment(state.principal(), dec!(0.339), dec!(5)).unwrap();
        assert!((back - dec!(15_000)).abs() < dec!(0.000001));
        assert!(engine.is_settled(&state));
    }

    #[test]
    fn test_open_clamps_principal_into_bounds() {
        let engine = LoanEngine::default();
        let defaults = SessionDefaults {
            category: CollateralCategory::RealEstate,
            seed_installment: dec!(1_000),
            term_years: dec!(5),
        };
        let state = engine.open_with(&defaults).unwrap();
        assert_eq!(state.principal(), dec!(500_000));
        assert!(state.installment() > dec!(1_000));
    }

    #[test]
    fn test_set_principal_does_not_clamp() {
        let engine = LoanEngine::default();
        let state = engine.open().unwrap();
        let next = engine.set_principal(&state, dec!(10)).unwrap();
        assert_eq!(next.principal(), dec!(10));
        assert!(!engine.is_settled(&next));
    }

    #[test]
    fn test_rejected_edit_is_an_error() {
        let engine = LoanEngine::default();
        let state = engine.open().unwrap();
        assert!(engine.set_term_years(&state, Decimal::ZERO).is_err());
        assert!(engine.set_term_years(&state, dec!(-3)).is_err());
    }

    #[test]
    fn test_commit_installment_clamps_payment() {
        let engine = LoanEngine::default();
        let state = engine.open().unwrap();
        let raw = engine.set_installment(&state, dec!(300_000)).unwrap();
        let committed = engine.commit_installment(&raw).unwrap();
        assert_eq!(committed.installment(), dec!(250_000));
        assert!(committed.principal() < raw.principal());
        assert!(engine.is_settled(&committed));
    }

    #[test]
    fn test_commit_installment_amount_bounds_win() {
        let engine = LoanEngine::default();
        let state = engine.open().unwrap();
        let state = engine.set_term_years(&state, dec!(1)).unwrap();
        let raw = engine.set_installment(&state, dec!(500)).unwrap();
        let committed = engine.commit_installment(&raw).unwrap();
        // 1000/month for a year only supports ~10k, below the 30k floor
        assert_eq!(committed.principal(), dec!(30_000));
        assert!(committed.installment() > dec!(1_000));
    }

    #[test]
    fn test_commit_installment_within_bounds_keeps_principal() {
        let engine = LoanEngine::default();
        let state = engine.open().unwrap();
        let raw = engine.set_installment(&state, dec!(20_000)).unwrap();
        let committed = engine.commit_installment(&raw).unwrap();
        assert_eq!(committed, raw);
    }

    #[test]
    fn test_compare_offers_baseline_saves_nothing() {
        let engine = LoanEngine::default();
        let state = engine.quote(CollateralCategory::Unsecured, dec!(1_000_000), dec!(5)).unwrap();
        let offers = engine.compare_offers(&state).unwrap();
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].category, CollateralCategory::Unsecured);
        assert_eq!(offers[0].saving_vs_baseline, Decimal::ZERO);
        assert!(offers[1].saving_vs_baseline > Decimal::ZERO);
        assert!(offers[2].saving_vs_baseline > Decimal::ZERO);
        assert!(offers[2].within_bounds);
    }

    #[test]
    fn test_compare_offers_flags_out_of_bounds() {
        let engine = LoanEngine::default();
        let state = engine.quote(CollateralCategory::Unsecured, dec!(100_000), dec!(5)).unwrap();
        let offers = engine.compare_offers(&state).unwrap();
        assert!(offers[1].within_bounds);
        assert!(!offers[2].within_bounds);
    }
}
