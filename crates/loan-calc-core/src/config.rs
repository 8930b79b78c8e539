use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::category::{Bounds, CategoryTable, CollateralCategory};
use crate::error::LoanCalcError;
use crate::types::{Money, Years};
use crate::LoanCalcResult;

/// Installment range applied when the user finishes editing the payment.
pub const DEFAULT_PAYMENT_BOUNDS: Bounds = Bounds::new(dec!(1_000), dec!(250_000));

/// Where a fresh session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub category: CollateralCategory,
    /// Installment the principal is derived from.
    pub seed_installment: Money,
    /// Requested term, clamped into the category's term bounds.
    pub term_years: Years,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        SessionDefaults {
            category: CollateralCategory::Unsecured,
            seed_installment: dec!(15_000),
            term_years: dec!(10),
        }
    }
}

/// Static configuration supplied once to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub categories: CategoryTable,
    pub payment_bounds: Bounds,
    pub defaults: SessionDefaults,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            categories: CategoryTable::default(),
            payment_bounds: DEFAULT_PAYMENT_BOUNDS,
            defaults: SessionDefaults::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> LoanCalcResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LoanCalcResult<()> {
        self.categories.validate()?;
        self.payment_bounds.validate("payment_bounds")?;

        if self.defaults.seed_installment <= Decimal::ZERO {
            return Err(LoanCalcError::config(
                "defaults.seed_installment",
                "Seed installment must be positive",
            ));
        }
        if self.defaults.term_years <= Decimal::ZERO {
            return Err(LoanCalcError::config(
                "defaults.term_years",
                "Default term must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.payment_bounds, Bounds::new(dec!(1000), dec!(250000)));
        assert_eq!(config.defaults.seed_installment, dec!(15000));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "payment_bounds": { "min": "500", "max": "100000" } }"#,
        )
        .unwrap();
        assert_eq!(config.payment_bounds.min, dec!(500));
        assert_eq!(config.categories, CategoryTable::default());
        assert_eq!(config.defaults, SessionDefaults::default());
    }

    #[test]
    fn test_rate_override_from_json() {
        let config = EngineConfig::from_json_str(
            r#"{
                "categories": {
                    "unsecured":   { "annual_rate": 0.30, "amount_bounds": { "min": 30000, "max": 7500000 }, "term_bounds": { "min": 1, "max": 5 } },
                    "vehicle":     { "annual_rate": 0.25, "amount_bounds": { "min": 30000, "max": 7500000 }, "term_bounds": { "min": 1, "max": 5 } },
                    "real_estate": { "annual_rate": 0.20, "amount_bounds": { "min": 500000, "max": 30000000 }, "term_bounds": { "min": 1, "max": 15 } }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.categories.vehicle.annual_rate, dec!(0.25));
    }

    #[test]
    fn test_non_positive_seed_rejected() {
        let mut config = EngineConfig::default();
        config.defaults.seed_installment = Decimal::ZERO;
        assert!(matches!(
            config.validate(),
            Err(LoanCalcError::InvalidConfig { .. })
        ));
    }
}
