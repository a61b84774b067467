//! Month-by-month amortization breakdown

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::debt::DebtKind;
use super::amortization::monthly_rate;

/// Remaining balance below half a cent counts as paid off
const SETTLED_BALANCE: f64 = 0.005;

/// A single month of a debt's amortization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    /// Month index (1-based)
    pub month: u32,

    /// Balance remaining after this month's payment
    pub balance: f64,

    /// Total paid this month (interest + principal + monthly fee)
    pub payment: f64,

    pub interest: f64,
    pub principal: f64,
}

/// Loan fee treatment applied while amortizing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FeeSchedule {
    #[default]
    None,
    /// Added to the starting balance once
    Upfront(f64),
    /// Taken out of every payment before principal
    Monthly(f64),
}

impl FeeSchedule {
    pub fn for_kind(kind: &DebtKind) -> Self {
        if let Some(fee) = kind.upfront_fee() {
            FeeSchedule::Upfront(fee)
        } else if let Some(fee) = kind.monthly_fee() {
            FeeSchedule::Monthly(fee)
        } else {
            FeeSchedule::None
        }
    }
}

/// Lazy, bounded amortization sequence
///
/// Yields at most `month_count` rows and stops early once the balance
/// reaches zero. Cloning produces an independent cursor, so a fresh clone
/// replays the same rows.
#[derive(Debug, Clone)]
pub struct MonthlyBreakdown {
    balance: f64,
    payment: f64,
    monthly_rate: f64,
    monthly_fee: f64,
    month_count: u32,
    next_month: u32,
}

impl MonthlyBreakdown {
    pub fn new(
        balance: f64,
        payment: f64,
        annual_rate_percent: f64,
        month_count: u32,
        fees: FeeSchedule,
    ) -> Self {
        let (starting_balance, monthly_fee) = match fees {
            FeeSchedule::None => (balance, 0.0),
            FeeSchedule::Upfront(fee) => (balance + fee, 0.0),
            FeeSchedule::Monthly(fee) => (balance, fee),
        };

        Self {
            balance: starting_balance,
            payment,
            monthly_rate: monthly_rate(annual_rate_percent),
            monthly_fee,
            month_count,
            next_month: 1,
        }
    }

    fn is_done(&self) -> bool {
        self.next_month > self.month_count || !(self.balance > 0.0)
    }
}

impl Iterator for MonthlyBreakdown {
    type Item = MonthRow;

    fn next(&mut self) -> Option<MonthRow> {
        if self.is_done() {
            return None;
        }

        let interest = self.balance * self.monthly_rate;
        let available_for_principal = self.payment - interest - self.monthly_fee;
        let mut principal = available_for_principal.max(0.0).min(self.balance);
        if self.balance - principal < SETTLED_BALANCE && principal > 0.0 {
            principal = self.balance;
        }
        let balance = self.balance - principal;

        let row = MonthRow {
            month: self.next_month,
            balance,
            payment: interest + principal + self.monthly_fee,
            interest,
            principal,
        };

        self.balance = balance;
        self.next_month += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_done() {
            (0, Some(0))
        } else {
            let remaining = (self.month_count - self.next_month + 1) as usize;
            (1, Some(remaining))
        }
    }
}

impl FusedIterator for MonthlyBreakdown {}

/// Breakdown of `balance` paid at `payment` per month for up to `month_count` months
pub fn monthly_breakdown(
    balance: f64,
    payment: f64,
    annual_rate_percent: f64,
    month_count: u32,
    fees: FeeSchedule,
) -> MonthlyBreakdown {
    MonthlyBreakdown::new(balance, payment, annual_rate_percent, month_count, fees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{months_to_payoff, resolve_minimum_payment, MinimumPaymentRules, Payoff};
    use crate::debt::{DebtRecord, FeeMode, InstallmentTerms, LoanFee};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_rate_loan_schedule() {
        let rows: Vec<MonthRow> = monthly_breakdown(1200.0, 100.0, 0.0, 12, FeeSchedule::None).collect();

        assert_eq!(rows.len(), 12);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.month, i as u32 + 1);
            assert_eq!(row.principal, 100.0);
            assert_eq!(row.interest, 0.0);
            assert_eq!(row.payment, 100.0);
        }
        assert_eq!(rows.last().unwrap().balance, 0.0);
    }

    #[test]
    fn test_first_month_split() {
        let first = monthly_breakdown(5000.0, 200.0, 18.0, 6, FeeSchedule::None).next().unwrap();
        assert_abs_diff_eq!(first.interest, 75.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.principal, 125.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.balance, 4875.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.payment, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounded_by_month_count() {
        let rows: Vec<MonthRow> = monthly_breakdown(5000.0, 200.0, 18.0, 6, FeeSchedule::None).collect();
        assert_eq!(rows.len(), 6);
        // continues beyond the window
        assert!(rows.last().unwrap().balance > 0.0);
    }

    #[test]
    fn test_stops_at_payoff() {
        let rows: Vec<MonthRow> = monthly_breakdown(5000.0, 200.0, 18.0, 120, FeeSchedule::None).collect();
        assert_eq!(Payoff::Months(rows.len() as u32), months_to_payoff(5000.0, 200.0, 18.0));

        let last = rows.last().unwrap();
        assert_eq!(last.balance, 0.0);
        // final month pays only what is owed
        assert!(last.payment < 200.0);
    }

    #[test]
    fn test_balance_never_increases() {
        for (balance, payment, apr) in [(5000.0, 200.0, 18.0), (10_000.0, 50.0, 12.0), (300.0, 500.0, 29.9)] {
            let rows: Vec<MonthRow> = monthly_breakdown(balance, payment, apr, 24, FeeSchedule::None).collect();
            assert!(rows.len() <= 24);
            let mut previous = balance;
            for row in &rows {
                assert!(row.balance <= previous);
                assert!(row.balance >= 0.0);
                assert!(row.principal >= 0.0);
                previous = row.balance;
            }
        }
    }

    #[test]
    fn test_unpayable_debt_holds_balance() {
        let rows: Vec<MonthRow> = monthly_breakdown(10_000.0, 50.0, 12.0, 3, FeeSchedule::None).collect();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.principal, 0.0);
            assert_eq!(row.balance, 10_000.0);
            assert_abs_diff_eq!(row.payment, row.interest);
        }
    }

    #[test]
    fn test_upfront_fee_added_to_starting_balance() {
        let rows: Vec<MonthRow> = monthly_breakdown(1200.0, 110.0, 0.0, 12, FeeSchedule::Upfront(120.0)).collect();
        assert_eq!(rows[0].balance, 1210.0);
        assert_eq!(rows.len(), 12);
        assert_abs_diff_eq!(rows.last().unwrap().balance, 0.0);
    }

    #[test]
    fn test_monthly_fee_reduces_principal() {
        let rows: Vec<MonthRow> = monthly_breakdown(1200.0, 105.0, 0.0, 12, FeeSchedule::Monthly(5.0)).collect();
        assert_eq!(rows[0].principal, 100.0);
        assert_eq!(rows[0].payment, 105.0);
        assert_eq!(rows.last().unwrap().balance, 0.0);
    }

    #[test]
    fn test_loan_minimum_schedule_spans_term() {
        let rules = MinimumPaymentRules::default();
        for apr in [1.0, 4.2, 6.5, 9.0, 12.5, 18.0, 24.99, 36.0] {
            for balance in [500.0, 1000.0, 3000.0, 8_750.25, 25_000.0] {
                for term in 1..=24 {
                    let terms = InstallmentTerms { term_months: Some(term), fee: None };
                    let loan = DebtRecord::installment("Loan", balance, apr, terms);
                    let payment = resolve_minimum_payment(&loan, &rules);

                    assert_eq!(months_to_payoff(balance, payment, apr), Payoff::Months(term));

                    let rows: Vec<MonthRow> =
                        monthly_breakdown(balance, payment, apr, 36, FeeSchedule::None).collect();
                    assert_eq!(rows.len(), term as usize, "{balance} at {apr}% over {term} months");
                    assert_eq!(rows.last().unwrap().balance, 0.0);
                    assert!(rows.last().unwrap().principal > 1.0);
                }
            }
        }
    }

    #[test]
    fn test_empty_for_zero_balance_or_window() {
        assert_eq!(monthly_breakdown(0.0, 100.0, 10.0, 12, FeeSchedule::None).count(), 0);
        assert_eq!(monthly_breakdown(1000.0, 100.0, 10.0, 0, FeeSchedule::None).count(), 0);
    }

    #[test]
    fn test_clone_replays_sequence() {
        let breakdown = monthly_breakdown(2500.0, 150.0, 21.0, 10, FeeSchedule::None);
        let first: Vec<MonthRow> = breakdown.clone().collect();
        let second: Vec<MonthRow> = breakdown.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_size_hint_upper_bound() {
        let mut breakdown = monthly_breakdown(2500.0, 150.0, 21.0, 4, FeeSchedule::None);
        assert_eq!(breakdown.size_hint(), (1, Some(4)));
        breakdown.next();
        assert_eq!(breakdown.size_hint(), (1, Some(3)));
        breakdown.by_ref().for_each(drop);
        assert_eq!(breakdown.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_fee_schedule_from_kind() {
        let upfront = DebtKind::Installment(InstallmentTerms {
            term_months: Some(6),
            fee: Some(LoanFee { amount: 30.0, mode: FeeMode::Upfront }),
        });
        assert_eq!(FeeSchedule::for_kind(&upfront), FeeSchedule::Upfront(30.0));

        let monthly = DebtKind::Installment(InstallmentTerms {
            term_months: None,
            fee: Some(LoanFee { amount: 4.0, mode: FeeMode::Monthly }),
        });
        assert_eq!(FeeSchedule::for_kind(&monthly), FeeSchedule::Monthly(4.0));
        assert_eq!(FeeSchedule::for_kind(&DebtKind::Revolving), FeeSchedule::None);
    }
}
