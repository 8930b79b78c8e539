use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanCalcError {
    #[error("Invalid numeric input: {field} — {reason}")]
    InvalidNumericInput { field: String, reason: String },

    #[error("Invalid configuration: {field} — {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanCalcError {
    pub(crate) fn numeric(field: &str, reason: impl Into<String>) -> Self {
        LoanCalcError::InvalidNumericInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(field: &str, reason: impl Into<String>) -> Self {
        LoanCalcError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoanCalcError {
    fn from(e: serde_json::Error) -> Self {
        LoanCalcError::SerializationError(e.to_string())
    }
}
