//! Error types for loading, storing and validating debt records
//!
//! The calculation engine itself never fails: degenerate inputs resolve to
//! sentinel values (`Payoff::Never`, zero interest). Errors only arise at the
//! edges where records are parsed, persisted or accepted.

use thiserror::Error;

use crate::debt::DebtId;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Debt with ID {0} not found")]
    DebtNotFound(DebtId),

    #[error("Unknown debt category: {0}")]
    UnknownCategory(String),

    #[error("Unknown fee mode: {0}")]
    UnknownFeeMode(String),

    #[error("Invalid debt: {}", .0.join("; "))]
    Validation(Vec<String>),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
