pub mod analytics;
pub mod annuity;
pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod numeric;
pub mod state;
pub mod types;

#[cfg(feature = "offer")]
pub mod offer;

#[cfg(feature = "session")]
pub mod session;

pub use category::{Bounds, CategoryTable, CategoryTerms, CollateralCategory};
pub use config::{EngineConfig, SessionDefaults};
pub use engine::LoanEngine;
pub use error::LoanCalcError;
pub use state::LoanState;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
