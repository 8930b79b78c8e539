pub mod categories;
pub mod offer;
pub mod session;

use clap::ValueEnum;
use loan_calc_core::CollateralCategory;

/// Collateral category as spelled on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Unsecured,
    Vehicle,
    RealEstate,
}

impl From<CategoryArg> for CollateralCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Unsecured => CollateralCategory::Unsecured,
            CategoryArg::Vehicle => CollateralCategory::Vehicle,
            CategoryArg::RealEstate => CollateralCategory::RealEstate,
        }
    }
}
