//! Summary statistics over a set of debts

use serde::{Deserialize, Serialize};

use crate::debt::DebtRecord;
use super::minimum::{resolve_minimum_payment, MinimumPaymentRules};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DebtSummary {
    pub total_balance: f64,
    /// Sum of resolved minimum payments
    pub total_minimum: f64,
    pub max_rate: f64,
    pub min_rate: f64,
    pub count: usize,
}

/// Totals and rate range for `debts`; all zeros when empty
pub fn summarize(debts: &[DebtRecord], rules: &MinimumPaymentRules) -> DebtSummary {
    if debts.is_empty() {
        return DebtSummary::default();
    }

    let total_balance = debts.iter().map(|d| d.balance).sum();
    let total_minimum = debts.iter().map(|d| resolve_minimum_payment(d, rules)).sum();
    let max_rate = debts.iter().map(|d| d.interest_rate).fold(f64::MIN, f64::max);
    let min_rate = debts.iter().map(|d| d.interest_rate).fold(f64::MAX, f64::min);

    DebtSummary {
        total_balance,
        total_minimum,
        max_rate,
        min_rate,
        count: debts.len(),
    }
}
