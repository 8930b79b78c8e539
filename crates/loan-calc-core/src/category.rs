//! Collateral categories and their rate/bounds table.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcError;
use crate::types::{Money, Rate, Years};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What, if anything, secures the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollateralCategory {
    #[default]
    Unsecured,
    Vehicle,
    RealEstate,
}

impl CollateralCategory {
    pub const ALL: [CollateralCategory; 3] = [
        CollateralCategory::Unsecured,
        CollateralCategory::Vehicle,
        CollateralCategory::RealEstate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CollateralCategory::Unsecured => "unsecured",
            CollateralCategory::Vehicle => "vehicle",
            CollateralCategory::RealEstate => "real_estate",
        }
    }
}

impl std::fmt::Display for CollateralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Bounds {
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Bounds { min, max }
    }

    /// Project `value` onto the interval.
    pub fn clamp(&self, value: Decimal) -> Decimal {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    pub(crate) fn validate(&self, field: &str) -> LoanCalcResult<()> {
        if self.min < Decimal::ZERO {
            return Err(LoanCalcError::config(field, "Lower bound must be non-negative"));
        }
        if self.min > self.max {
            return Err(LoanCalcError::config(
                field,
                format!("Lower bound {} exceeds upper bound {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Immutable parameters attached to one collateral category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTerms {
    pub annual_rate: Rate,
    /// Principal range in whole currency units.
    pub amount_bounds: Bounds,
    /// Term range in years.
    pub term_bounds: Bounds,
}

/// Rate and bounds for every category, indexed by the enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub unsecured: CategoryTerms,
    pub vehicle: CategoryTerms,
    pub real_estate: CategoryTerms,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const CONSUMER_AMOUNT: Bounds = Bounds::new(dec!(30_000), dec!(7_500_000));
const CONSUMER_TERM: Bounds = Bounds::new(dec!(1), dec!(5));

impl Default for CategoryTable {
    fn default() -> Self {
        CategoryTable {
            unsecured: CategoryTerms {
                annual_rate: dec!(0.339),
                amount_bounds: CONSUMER_AMOUNT,
                term_bounds: CONSUMER_TERM,
            },
            vehicle: CategoryTerms {
                annual_rate: dec!(0.27),
                amount_bounds: CONSUMER_AMOUNT,
                term_bounds: CONSUMER_TERM,
            },
            real_estate: CategoryTerms {
                annual_rate: dec!(0.2807),
                amount_bounds: Bounds::new(dec!(500_000), dec!(30_000_000)),
                term_bounds: Bounds::new(dec!(1), dec!(15)),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

impl CategoryTable {
    pub fn terms(&self, category: CollateralCategory) -> &CategoryTerms {
        match category {
            CollateralCategory::Unsecured => &self.unsecured,
            CollateralCategory::Vehicle => &self.vehicle,
            CollateralCategory::RealEstate => &self.real_estate,
        }
    }

    pub fn rate(&self, category: CollateralCategory) -> Rate {
        self.terms(category).annual_rate
    }

    pub fn clamp_principal(&self, category: CollateralCategory, principal: Money) -> Money {
        self.terms(category).amount_bounds.clamp(principal)
    }

    pub fn clamp_term(&self, category: CollateralCategory, term_years: Years) -> Years {
        self.terms(category).term_bounds.clamp(term_years)
    }

    /// Reject tables whose bounds are inverted or whose rates are unusable.
    pub fn validate(&self) -> LoanCalcResult<()> {
        for category in CollateralCategory::ALL {
            let terms = self.terms(category);
            let prefix = category.label();

            if terms.annual_rate < Decimal::ZERO {
                return Err(LoanCalcError::config(
                    &format!("{prefix}.annual_rate"),
                    "Rate must be non-negative",
                ));
            }
            // Monthly rate of 100% or more makes the annuity meaningless.
            if terms.annual_rate >= crate::annuity::PERIODS_PER_YEAR {
                return Err(LoanCalcError::config(
                    &format!("{prefix}.annual_rate"),
                    "Rate must be below 1200%",
                ));
            }
            terms.amount_bounds.validate(&format!("{prefix}.amount_bounds"))?;
            terms.term_bounds.validate(&format!("{prefix}.term_bounds"))?;
            if terms.term_bounds.min.is_zero() {
                return Err(LoanCalcError::config(
                    &format!("{prefix}.term_bounds"),
                    "Minimum term must be positive",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_table_matches_offer() {
        let table = CategoryTable::default();
        assert_eq!(table.rate(CollateralCategory::Unsecured), dec!(0.339));
        assert_eq!(table.rate(CollateralCategory::Vehicle), dec!(0.27));
        assert_eq!(table.rate(CollateralCategory::RealEstate), dec!(0.2807));
        assert_eq!(
            table.terms(CollateralCategory::RealEstate).amount_bounds,
            Bounds::new(dec!(500_000), dec!(30_000_000))
        );
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_clamp() {
        let bounds = Bounds::new(dec!(1), dec!(5));
        assert_eq!(bounds.clamp(dec!(0.5)), dec!(1));
        assert_eq!(bounds.clamp(dec!(20)), dec!(5));
        assert_eq!(bounds.clamp(dec!(3.5)), dec!(3.5));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut table = CategoryTable::default();
        table.vehicle.amount_bounds = Bounds::new(dec!(10), dec!(5));
        assert!(matches!(
            table.validate(),
            Err(LoanCalcError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut table = CategoryTable::default();
        table.unsecured.annual_rate = dec!(-0.01);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&CollateralCategory::RealEstate).unwrap();
        assert_eq!(json, "\"real_estate\"");
    }
}
