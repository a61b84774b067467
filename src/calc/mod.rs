//! Calculation engine for avalanche allocation and amortization projections
//!
//! Every function here is pure: inputs are borrowed immutably, results are new
//! values, and nothing is cached between calls.

mod amortization;
mod minimum;
mod breakdown;
mod avalanche;
mod summary;

pub use amortization::{
    Payoff, monthly_rate, months_to_payoff, total_interest, loan_payment, MAX_PAYOFF_MONTHS,
};
pub use minimum::{MinimumPaymentRules, resolve_minimum_payment, DEFAULT_MIN_PAYMENT_FLOOR};
pub use breakdown::{MonthRow, FeeSchedule, MonthlyBreakdown, monthly_breakdown};
pub use avalanche::{
    AvalancheEngine, StrategyConfig, Strategy, AvalancheRecommendation,
    calculate_avalanche_strategy, DEFAULT_MONTHS_TO_SHOW,
};
pub use summary::{DebtSummary, summarize};
