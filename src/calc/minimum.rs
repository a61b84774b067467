//! Minimum payment derivation per debt category

use crate::debt::{DebtKind, DebtRecord, DEFAULT_MIN_PAYMENT_PERCENT};
use super::amortization::loan_payment;

/// Smallest derived minimum payment for percentage-based debts
pub const DEFAULT_MIN_PAYMENT_FLOOR: f64 = 25.0;

/// Parameters for deriving a minimum payment when a debt has none
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumPaymentRules {
    /// Percentage of balance (2.0 = 2%)
    pub default_percent: f64,

    /// Lower bound on a percentage-derived minimum
    pub floor: f64,
}

impl Default for MinimumPaymentRules {
    fn default() -> Self {
        Self {
            default_percent: DEFAULT_MIN_PAYMENT_PERCENT,
            floor: DEFAULT_MIN_PAYMENT_FLOOR,
        }
    }
}

impl MinimumPaymentRules {
    /// Rules with the given default percentage; non-positive values fall back to 2%
    pub fn with_default_percent(percent: f64) -> Self {
        let default_percent = if percent.is_finite() && percent > 0.0 {
            percent
        } else {
            DEFAULT_MIN_PAYMENT_PERCENT
        };
        Self {
            default_percent,
            ..Self::default()
        }
    }
}

/// Effective minimum payment for a debt
///
/// - An explicit positive minimum always wins.
/// - An installment loan with a term pays the annuity amount on its balance
///   (plus any upfront fee), with a monthly fee added on top.
/// - Anything else pays `default_percent` of the balance, but never less than
///   the floor.
///
/// The record itself is never modified.
pub fn resolve_minimum_payment(debt: &DebtRecord, rules: &MinimumPaymentRules) -> f64 {
    if let Some(minimum) = debt.explicit_minimum() {
        return minimum;
    }

    if let DebtKind::Installment(terms) = &debt.kind {
        if let Some(term) = terms.term_months {
            let effective_balance = debt.balance + debt.kind.upfront_fee().unwrap_or(0.0);
            let payment = loan_payment(effective_balance, debt.interest_rate, term);
            return payment + debt.kind.monthly_fee().unwrap_or(0.0);
        }
    }

    (debt.balance * rules.default_percent / 100.0).max(rules.floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::{FeeMode, InstallmentTerms, LoanFee};
    use approx::assert_abs_diff_eq;

    fn loan(balance: f64, rate: f64, term: Option<u32>, fee: Option<LoanFee>) -> DebtRecord {
        DebtRecord::installment("Loan", balance, rate, InstallmentTerms { term_months: term, fee })
    }

    #[test]
    fn test_explicit_minimum_wins() {
        let debt = DebtRecord::revolving("Student Loan", 15_000.0, Some(200.0), 6.5);
        assert_eq!(resolve_minimum_payment(&debt, &MinimumPaymentRules::default()), 200.0);

        let mut termed = loan(1200.0, 0.0, Some(12), None);
        termed.minimum_payment = Some(150.0);
        assert_eq!(resolve_minimum_payment(&termed, &MinimumPaymentRules::default()), 150.0);
    }

    #[test]
    fn test_percentage_with_floor() {
        let rules = MinimumPaymentRules::default();
        let card = |balance| DebtRecord::revolving("Card", balance, None, 24.99);

        assert_eq!(resolve_minimum_payment(&card(5000.0), &rules), 100.0);
        assert_eq!(resolve_minimum_payment(&card(1000.0), &rules), 25.0);
        assert_eq!(resolve_minimum_payment(&card(100.0), &rules), 25.0);

        let ten_percent = MinimumPaymentRules::with_default_percent(10.0);
        assert_eq!(resolve_minimum_payment(&card(1000.0), &ten_percent), 100.0);
        assert_eq!(resolve_minimum_payment(&card(200.0), &ten_percent), 25.0);
    }

    #[test]
    fn test_zero_explicit_minimum_is_derived() {
        let debt = DebtRecord::revolving("Card", 5000.0, Some(0.0), 24.99);
        assert_eq!(resolve_minimum_payment(&debt, &MinimumPaymentRules::default()), 100.0);
    }

    #[test]
    fn test_zero_rate_loan_divides_evenly() {
        let debt = loan(1200.0, 0.0, Some(12), None);
        assert_eq!(resolve_minimum_payment(&debt, &MinimumPaymentRules::default()), 100.0);
    }

    #[test]
    fn test_interest_bearing_loan_uses_annuity() {
        let debt = loan(10_000.0, 12.0, Some(24), None);
        assert_abs_diff_eq!(
            resolve_minimum_payment(&debt, &MinimumPaymentRules::default()),
            470.7347,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_loan_fees() {
        let rules = MinimumPaymentRules::default();

        let upfront = loan(1200.0, 0.0, Some(12), Some(LoanFee { amount: 120.0, mode: FeeMode::Upfront }));
        assert_abs_diff_eq!(resolve_minimum_payment(&upfront, &rules), 110.0);

        let monthly = loan(1200.0, 0.0, Some(12), Some(LoanFee { amount: 5.0, mode: FeeMode::Monthly }));
        assert_abs_diff_eq!(resolve_minimum_payment(&monthly, &rules), 105.0);
    }

    #[test]
    fn test_loan_without_term_uses_percentage() {
        let debt = loan(3000.0, 8.0, None, Some(LoanFee { amount: 10.0, mode: FeeMode::Monthly }));
        assert_eq!(resolve_minimum_payment(&debt, &MinimumPaymentRules::default()), 60.0);
    }

    #[test]
    fn test_invalid_default_percent_falls_back() {
        assert_eq!(MinimumPaymentRules::with_default_percent(0.0).default_percent, 2.0);
        assert_eq!(MinimumPaymentRules::with_default_percent(f64::NAN).default_percent, 2.0);
        assert_eq!(MinimumPaymentRules::with_default_percent(5.0).default_percent, 5.0);
    }
}
