//! Structural and range checks for candidate debt records
//!
//! A `DebtDraft` is the loosely-typed form of a debt as it arrives from a form,
//! a CSV row or the command line. Every field may be missing. `validate` reports
//! every violation at once; `into_record` is the only way to turn a draft into a
//! typed `DebtRecord`.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::data::{
    DebtCategory, DebtKind, DebtRecord, FeeMode, InstallmentTerms, LoanFee,
};
use crate::error::{PlannerError, PlannerResult};

/// Bounds applied during validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationLimits {
    pub max_interest_rate: f64,
    pub min_term_months: u32,
    pub max_term_months: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_interest_rate: 100.0,
            min_term_months: 1,
            max_term_months: 24,
        }
    }
}

/// Candidate debt before acceptance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtDraft {
    #[serde(default)]
    pub creditor_name: String,
    #[serde(default)]
    pub category: Option<DebtCategory>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub minimum_payment: Option<f64>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub term_months: Option<u32>,
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub fee_mode: Option<FeeMode>,
}

impl DebtDraft {
    /// Validate and convert into a record with a fresh identifier
    pub fn into_record(self, now: DateTime<Utc>) -> PlannerResult<DebtRecord> {
        self.into_record_with_limits(&ValidationLimits::default(), now)
    }

    pub fn into_record_with_limits(
        self,
        limits: &ValidationLimits,
        now: DateTime<Utc>,
    ) -> PlannerResult<DebtRecord> {
        let errors = validate_with_limits(&self, limits);
        if !errors.is_empty() {
            return Err(PlannerError::Validation(errors));
        }

        // validation guarantees these are present
        let (Some(category), Some(balance), Some(interest_rate)) =
            (self.category, self.balance, self.interest_rate)
        else {
            return Err(PlannerError::Validation(vec!["Incomplete debt".to_string()]));
        };

        let kind = match category {
            DebtCategory::Revolving => {
                if self.term_months.is_some() || self.fee.is_some() {
                    debug!("Ignoring loan terms on revolving debt '{}'", self.creditor_name);
                }
                DebtKind::Revolving
            }
            DebtCategory::Installment => {
                let fee = match (self.fee, self.fee_mode) {
                    (Some(amount), Some(mode)) if amount > 0.0 => Some(LoanFee { amount, mode }),
                    _ => None,
                };
                DebtKind::Installment(InstallmentTerms {
                    term_months: self.term_months,
                    fee,
                })
            }
        };

        Ok(DebtRecord::new(
            self.creditor_name.trim(),
            kind,
            balance,
            self.minimum_payment,
            interest_rate,
            now,
        ))
    }
}

impl From<&DebtRecord> for DebtDraft {
    fn from(debt: &DebtRecord) -> Self {
        let (term_months, fee, fee_mode) = match debt.kind {
            DebtKind::Revolving => (None, None, None),
            DebtKind::Installment(terms) => (
                terms.term_months,
                terms.fee.map(|f| f.amount),
                terms.fee.map(|f| f.mode),
            ),
        };
        Self {
            creditor_name: debt.creditor_name.clone(),
            category: Some(debt.kind.category()),
            balance: Some(debt.balance),
            minimum_payment: debt.minimum_payment,
            interest_rate: Some(debt.interest_rate),
            term_months,
            fee,
            fee_mode,
        }
    }
}

/// Validate a candidate debt with the default limits
///
/// Returns every violation found; an empty vector means the draft is valid.
pub fn validate(draft: &DebtDraft) -> Vec<String> {
    validate_with_limits(draft, &ValidationLimits::default())
}

pub fn validate_with_limits(draft: &DebtDraft, limits: &ValidationLimits) -> Vec<String> {
    let mut errors = Vec::new();

    if draft.creditor_name.trim().is_empty() {
        errors.push("Creditor name is required".to_string());
    }

    if draft.category.is_none() {
        errors.push("Debt type is required".to_string());
    }

    // written as negations so NaN fails the check
    if !matches!(draft.balance, Some(b) if b > 0.0) {
        errors.push("Balance must be greater than 0".to_string());
    }

    if let Some(minimum) = draft.minimum_payment {
        if !(minimum > 0.0) {
            errors.push("Minimum payment must be greater than 0 if provided".to_string());
        }
    }

    if !matches!(draft.interest_rate, Some(r) if (0.0..=limits.max_interest_rate).contains(&r)) {
        errors.push(format!(
            "Interest rate must be between 0 and {}",
            limits.max_interest_rate
        ));
    }

    if draft.category == Some(DebtCategory::Installment) {
        if let Some(term) = draft.term_months {
            if !(limits.min_term_months..=limits.max_term_months).contains(&term) {
                errors.push(format!(
                    "Loan duration must be between {} and {} months",
                    limits.min_term_months, limits.max_term_months
                ));
            }
        }

        if let Some(fee) = draft.fee {
            if !(fee >= 0.0) {
                errors.push("Loan fee cannot be negative".to_string());
            }
            if fee > 0.0 && draft.fee_mode.is_none() {
                errors.push("Loan fee type is required when fee is specified".to_string());
            }
        }
    }

    errors
}

/// Reject a typed record that would not pass `validate` as a draft
pub fn check_record(debt: &DebtRecord) -> PlannerResult<()> {
    let errors = validate(&DebtDraft::from(debt));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PlannerError::Validation(errors))
    }
}

/// Check a batch of typed records; messages are prefixed with the 1-based position
pub fn check_records(debts: &[DebtRecord]) -> PlannerResult<()> {
    let errors: Vec<String> = debts
        .iter()
        .enumerate()
        .flat_map(|(i, debt)| {
            validate(&DebtDraft::from(debt))
                .into_iter()
                .map(move |e| format!("Debt {}: {}", i + 1, e))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PlannerError::Validation(errors))
    }
}
