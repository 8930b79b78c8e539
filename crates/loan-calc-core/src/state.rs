use serde::{Deserialize, Serialize};

use crate::category::CollateralCategory;
use crate::types::{Money, Years};

/// The reconciled loan triple plus the category it was priced under.
///
/// Only [`crate::LoanEngine`] operations produce new states; the presentation
/// layer reads it through the accessors and threads it back into the next edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanState {
    category: CollateralCategory,
    principal: Money,
    term_years: Years,
    installment: Money,
}

impl LoanState {
    pub(crate) fn new(
        category: CollateralCategory,
        principal: Money,
        term_years: Years,
        installment: Money,
    ) -> Self {
        LoanState {
            category,
            principal,
            term_years,
            installment,
        }
    }

    pub fn category(&self) -> CollateralCategory {
        self.category
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn term_years(&self) -> Years {
        self.term_years
    }

    pub fn installment(&self) -> Money {
        self.installment
    }

    pub(crate) fn with_principal(self, principal: Money) -> Self {
        LoanState { principal, ..self }
    }

    pub(crate) fn with_term_years(self, term_years: Years) -> Self {
        LoanState { term_years, ..self }
    }

    pub(crate) fn with_installment(self, installment: Money) -> Self {
        LoanState { installment, ..self }
    }
}
