//! Avalanche Planner - Debt repayment allocation and amortization projections
//!
//! This library provides:
//! - Debt records with revolving and installment variants
//! - Minimum payment derivation (percentage of balance or loan annuity)
//! - Closed-form payoff time and total interest calculations
//! - Avalanche allocation of surplus funds to the highest-rate debt
//! - Month-by-month amortization breakdowns
//! - Validation, storage and import of debt records

pub mod error;
pub mod debt;
pub mod calc;
pub mod format;
pub mod scenario;

// Re-export commonly used types
pub use error::{PlannerError, PlannerResult};
pub use debt::{DebtRecord, DebtKind, DebtDraft, UserProfile, validate};
pub use calc::{
    AvalancheEngine, StrategyConfig, Strategy, AvalancheRecommendation, MonthRow, Payoff,
    calculate_avalanche_strategy,
};
pub use scenario::ScenarioRunner;
