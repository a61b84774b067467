//! Avalanche allocation: minimums everywhere, surplus to the highest rate
//!
//! The result is a single-period snapshot. Only the top-ranked debt receives
//! surplus, and the aggregate payoff figure reflects that debt alone; paid-off
//! debts are not rolled forward into the next-highest rate.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::debt::{DebtId, DebtRecord};
use super::amortization::{months_to_payoff, total_interest, Payoff};
use super::breakdown::{monthly_breakdown, FeeSchedule, MonthRow};
use super::minimum::{resolve_minimum_payment, MinimumPaymentRules};

/// Months of breakdown shown when the caller does not say otherwise
pub const DEFAULT_MONTHS_TO_SHOW: u32 = 6;

/// Configuration for a strategy calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyConfig {
    /// Number of breakdown months per recommendation
    pub months_to_show: u32,

    /// How minimums are derived for debts without one
    pub minimum: MinimumPaymentRules,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            months_to_show: DEFAULT_MONTHS_TO_SHOW,
            minimum: MinimumPaymentRules::default(),
        }
    }
}

impl StrategyConfig {
    pub fn new(months_to_show: u32, default_min_percent: f64) -> Self {
        Self {
            months_to_show,
            minimum: MinimumPaymentRules::with_default_percent(default_min_percent),
        }
    }
}

/// Recommended payment and projection for one debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheRecommendation {
    pub debt_id: DebtId,
    pub creditor_name: String,
    pub current_balance: f64,

    /// Resolved minimum payment
    pub minimum_payment: f64,

    pub interest_rate: f64,

    /// Minimum plus any surplus assigned to this debt
    pub recommended_payment: f64,

    /// Whether this debt receives the surplus
    pub is_target_debt: bool,

    /// Payoff time at the recommended payment
    pub months_to_payoff: Payoff,

    /// Interest avoided versus paying only the minimum
    pub interest_saved: f64,

    pub monthly_breakdown: Vec<MonthRow>,
}

impl AvalancheRecommendation {
    /// True when the breakdown window ends before the debt is paid off
    pub fn continues_beyond_window(&self) -> bool {
        self.monthly_breakdown
            .last()
            .map(|row| row.balance > 0.0)
            .unwrap_or(false)
    }
}

/// Aggregate result of an avalanche calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub total_available_funds: f64,
    pub total_minimum_payments: f64,

    /// Funds left after all minimums (never negative)
    pub extra_funds: f64,

    /// Ordered by descending interest rate
    pub recommendations: Vec<AvalancheRecommendation>,

    /// Payoff time of the target debt only; `Never` when there is no target
    pub total_months_to_debt_free: Payoff,

    /// Interest saved on the target debt only
    pub total_interest_saved: f64,

    pub calculated_at: DateTime<Utc>,
}

impl Strategy {
    /// Strategy for an empty debt list
    fn empty(available_funds: f64) -> Self {
        Self {
            total_available_funds: available_funds,
            total_minimum_payments: 0.0,
            extra_funds: available_funds,
            recommendations: Vec::new(),
            total_months_to_debt_free: Payoff::Months(0),
            total_interest_saved: 0.0,
            calculated_at: Utc::now(),
        }
    }

    /// The debt receiving surplus funds, if any
    pub fn target(&self) -> Option<&AvalancheRecommendation> {
        self.recommendations.iter().find(|r| r.is_target_debt)
    }

    pub fn recommendation(&self, id: DebtId) -> Option<&AvalancheRecommendation> {
        self.recommendations.iter().find(|r| r.debt_id == id)
    }

    /// Whether minimums exceed available funds
    pub fn is_underfunded(&self) -> bool {
        self.total_minimum_payments > self.total_available_funds
    }
}

/// Debt paired with its resolved minimum for one calculation pass
#[derive(Debug, Clone, Copy)]
struct WorkingDebt<'a> {
    debt: &'a DebtRecord,
    minimum_payment: f64,
}

/// Avalanche calculator
#[derive(Debug, Clone, Default)]
pub struct AvalancheEngine {
    config: StrategyConfig,
}

impl AvalancheEngine {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// Allocate `available_funds` across `debts`
    pub fn calculate(&self, debts: &[DebtRecord], available_funds: f64) -> Strategy {
        if debts.is_empty() {
            return Strategy::empty(available_funds);
        }

        let mut working: Vec<WorkingDebt> = debts
            .iter()
            .map(|debt| WorkingDebt {
                debt,
                minimum_payment: resolve_minimum_payment(debt, &self.config.minimum),
            })
            .collect();

        // stable: equal rates keep input order
        working.sort_by(|a, b| b.debt.interest_rate.total_cmp(&a.debt.interest_rate));

        let total_minimum: f64 = working.iter().map(|w| w.minimum_payment).sum();
        let extra_funds = (available_funds - total_minimum).max(0.0);

        let recommendations: Vec<AvalancheRecommendation> = working
            .iter()
            .enumerate()
            .map(|(index, w)| self.recommend(w, index == 0 && extra_funds > 0.0, extra_funds))
            .collect();

        let target = recommendations.iter().find(|r| r.is_target_debt);
        let total_months_to_debt_free = target
            .map(|r| r.months_to_payoff)
            .unwrap_or(Payoff::Never);
        let total_interest_saved = target.map(|r| r.interest_saved).unwrap_or(0.0);

        debug!(
            "Avalanche over {} debts: funds={:.2} minimums={:.2} extra={:.2} debt-free={}",
            debts.len(),
            available_funds,
            total_minimum,
            extra_funds,
            total_months_to_debt_free
        );

        Strategy {
            total_available_funds: available_funds,
            total_minimum_payments: total_minimum,
            extra_funds,
            recommendations,
            total_months_to_debt_free,
            total_interest_saved,
            calculated_at: Utc::now(),
        }
    }

    fn recommend(&self, w: &WorkingDebt, is_target: bool, extra_funds: f64) -> AvalancheRecommendation {
        let debt = w.debt;
        let recommended_payment = w.minimum_payment + if is_target { extra_funds } else { 0.0 };

        let interest_with_minimum = total_interest(debt.balance, w.minimum_payment, debt.interest_rate);
        let interest_with_recommended = total_interest(debt.balance, recommended_payment, debt.interest_rate);

        let monthly_breakdown = monthly_breakdown(
            debt.balance,
            recommended_payment,
            debt.interest_rate,
            self.config.months_to_show,
            FeeSchedule::for_kind(&debt.kind),
        )
        .collect();

        AvalancheRecommendation {
            debt_id: debt.id,
            creditor_name: debt.creditor_name.clone(),
            current_balance: debt.balance,
            minimum_payment: w.minimum_payment,
            interest_rate: debt.interest_rate,
            recommended_payment,
            is_target_debt: is_target,
            months_to_payoff: months_to_payoff(debt.balance, recommended_payment, debt.interest_rate),
            interest_saved: (interest_with_minimum - interest_with_recommended).max(0.0),
            monthly_breakdown,
        }
    }
}

/// Compute the avalanche strategy for a set of debts
pub fn calculate_avalanche_strategy(
    debts: &[DebtRecord],
    available_funds: f64,
    months_to_show: u32,
    default_min_percent: f64,
) -> Strategy {
    AvalancheEngine::new(StrategyConfig::new(months_to_show, default_min_percent))
        .calculate(debts, available_funds)
}
