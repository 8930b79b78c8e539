//! Flat snapshot handed to the analytics collaborator when the user confirms.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::category::CollateralCategory;
use crate::error::LoanCalcError;
use crate::state::LoanState;
use crate::LoanCalcResult;

/// Category code agreed with the analytics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChosenOption {
    Nothing,
    Auto,
    Property,
}

impl From<CollateralCategory> for ChosenOption {
    fn from(category: CollateralCategory) -> Self {
        match category {
            CollateralCategory::Unsecured => ChosenOption::Nothing,
            CollateralCategory::Vehicle => ChosenOption::Auto,
            CollateralCategory::RealEstate => ChosenOption::Property,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    /// Principal, two decimals.
    #[serde(rename = "sum_cred")]
    pub principal: String,
    /// Term in whole years.
    #[serde(rename = "srok_kredita")]
    pub term_years: u32,
    /// Installment, two decimals.
    #[serde(rename = "platezh_mes")]
    pub installment: String,
    pub chosen_option: ChosenOption,
}

impl AnalyticsRecord {
    pub fn from_state(state: &LoanState) -> LoanCalcResult<Self> {
        let term_years = state
            .term_years()
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .ok_or_else(|| {
                LoanCalcError::numeric("term_years", "Term must be a non-negative whole number of years")
            })?;

        Ok(AnalyticsRecord {
            principal: two_decimals(state.principal()),
            term_years,
            installment: two_decimals(state.installment()),
            chosen_option: state.category().into(),
        })
    }
}

fn two_decimals(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LoanEngine;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_fields() {
        let engine = LoanEngine::default();
        let state = engine
            .quote(CollateralCategory::Vehicle, dec!(1_000_000), dec!(3))
            .unwrap();
        let record = AnalyticsRecord::from_state(&state).unwrap();
        assert_eq!(record.principal, "1000000.00");
        assert_eq!(record.term_years, 3);
        assert_eq!(record.chosen_option, ChosenOption::Auto);
        assert_eq!(record.installment.split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn test_wire_names() {
        let engine = LoanEngine::default();
        let state = engine
            .quote(CollateralCategory::RealEstate, dec!(2_500_000.005), dec!(2.5))
            .unwrap();
        let json = serde_json::to_value(AnalyticsRecord::from_state(&state).unwrap()).unwrap();
        assert_eq!(json["sum_cred"], "2500000.01");
        assert_eq!(json["srok_kredita"], 3);
        assert_eq!(json["chosen_option"], "property");
        assert!(json["platezh_mes"].is_string());
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(ChosenOption::from(CollateralCategory::Unsecured), ChosenOption::Nothing);
        assert_eq!(ChosenOption::from(CollateralCategory::Vehicle), ChosenOption::Auto);
        assert_eq!(ChosenOption::from(CollateralCategory::RealEstate), ChosenOption::Property);
    }
}
