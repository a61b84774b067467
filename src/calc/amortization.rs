//! Closed-form amortization math for fixed monthly payments
//!
//! Rates are annual percentages (18.0 for 18% APR) converted to a monthly
//! rate by dividing by 12.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest payoff reported as finite (1,000 years); anything slower is `Never`
pub const MAX_PAYOFF_MONTHS: u32 = 12_000;

/// Fraction of a month treated as rounding noise before rounding up
const MONTHS_TOLERANCE: f64 = 1e-6;

/// Time to pay a debt off at a fixed payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payoff {
    /// Paid off after this many months (a partial final month counts as one)
    Months(u32),
    /// The payment never exceeds the accruing interest
    Never,
}

impl Payoff {
    pub fn is_never(&self) -> bool {
        matches!(self, Payoff::Never)
    }

    pub fn months(&self) -> Option<u32> {
        match self {
            Payoff::Months(m) => Some(*m),
            Payoff::Never => None,
        }
    }
}

impl fmt::Display for Payoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payoff::Months(1) => write!(f, "1 month"),
            Payoff::Months(m) => write!(f, "{} months", m),
            Payoff::Never => write!(f, "never"),
        }
    }
}

/// Convert an annual percentage rate to a monthly decimal rate
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Number of months to pay off `balance` with a fixed `monthly_payment`
///
/// Uses n = -ln(1 - r*P/A) / ln(1 + r), rounded up once float noise below
/// `MONTHS_TOLERANCE` is discarded, so an annuity payment pays off in exactly
/// its term. Zero balance or payment gives `Months(0)`; a payment at or below
/// the first month's interest, or a payoff beyond `MAX_PAYOFF_MONTHS`, gives
/// `Never`.
pub fn months_to_payoff(balance: f64, monthly_payment: f64, annual_rate_percent: f64) -> Payoff {
    if monthly_payment <= 0.0 || balance <= 0.0 {
        return Payoff::Months(0);
    }

    let r = monthly_rate(annual_rate_percent);
    if monthly_payment <= balance * r {
        return Payoff::Never;
    }

    let months = if r == 0.0 {
        balance / monthly_payment
    } else {
        -(1.0 - r * balance / monthly_payment).ln() / r.ln_1p()
    };

    let months = (months - MONTHS_TOLERANCE).ceil().max(1.0);
    if !(months <= MAX_PAYOFF_MONTHS as f64) {
        return Payoff::Never;
    }

    Payoff::Months(months as u32)
}

/// Total interest paid over the life of the debt at a fixed payment
///
/// Zero when the debt is never paid off or there is nothing to pay.
pub fn total_interest(balance: f64, monthly_payment: f64, annual_rate_percent: f64) -> f64 {
    match months_to_payoff(balance, monthly_payment, annual_rate_percent) {
        Payoff::Never | Payoff::Months(0) => 0.0,
        Payoff::Months(months) => (monthly_payment * months as f64 - balance).max(0.0),
    }
}

/// Level monthly payment that amortizes `principal` over `term_months`
pub fn loan_payment(principal: f64, annual_rate_percent: f64, term_months: u32) -> f64 {
    // a zero-length term is due in full
    if term_months == 0 {
        return principal;
    }

    let r = monthly_rate(annual_rate_percent);
    if r == 0.0 {
        return principal / term_months as f64;
    }

    let growth = (1.0 + r).powi(term_months as i32);
    principal * r * growth / (growth - 1.0)
}
