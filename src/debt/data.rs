//! Debt record structures matching the stored debt format

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlannerError;

/// Currency used when a profile does not name one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Minimum payment percentage used when a profile does not set one
pub const DEFAULT_MIN_PAYMENT_PERCENT: f64 = 2.0;

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_min_payment_percent() -> f64 {
    DEFAULT_MIN_PAYMENT_PERCENT
}

/// Opaque debt identifier, assigned once at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebtId(Uuid);

impl DebtId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DebtId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DebtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "debt_{}", self.0.simple())
    }
}

impl FromStr for DebtId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("debt_").unwrap_or(s);
        Uuid::parse_str(raw).map(DebtId)
    }
}

/// Broad category of a debt, without category-specific terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtCategory {
    /// Open-ended credit such as a credit card
    Revolving,
    /// Fixed-term loan
    Installment,
}

impl DebtCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtCategory::Revolving => "revolving",
            DebtCategory::Installment => "installment",
        }
    }
}

impl FromStr for DebtCategory {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revolving" | "credit_card" => Ok(DebtCategory::Revolving),
            "installment" | "loan" => Ok(DebtCategory::Installment),
            other => Err(PlannerError::UnknownCategory(other.to_string())),
        }
    }
}

/// How an installment loan fee is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeMode {
    /// Added to the principal once
    Upfront,
    /// Added to every period's payment
    Monthly,
}

impl FromStr for FeeMode {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upfront" => Ok(FeeMode::Upfront),
            "monthly" => Ok(FeeMode::Monthly),
            other => Err(PlannerError::UnknownFeeMode(other.to_string())),
        }
    }
}

/// Loan fee; a fee always carries its application mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanFee {
    pub amount: f64,
    pub mode: FeeMode,
}

/// Terms that only exist for installment loans
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InstallmentTerms {
    /// Original loan term in months (1-24)
    #[serde(default)]
    pub term_months: Option<u32>,

    #[serde(default)]
    pub fee: Option<LoanFee>,
}

/// Category of a debt together with its category-specific terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum DebtKind {
    Revolving,
    Installment(InstallmentTerms),
}

impl DebtKind {
    pub fn category(&self) -> DebtCategory {
        match self {
            DebtKind::Revolving => DebtCategory::Revolving,
            DebtKind::Installment(_) => DebtCategory::Installment,
        }
    }

    pub fn term_months(&self) -> Option<u32> {
        match self {
            DebtKind::Installment(terms) => terms.term_months,
            DebtKind::Revolving => None,
        }
    }

    /// Fee amount charged once against the principal, if any
    pub fn upfront_fee(&self) -> Option<f64> {
        match self {
            DebtKind::Installment(InstallmentTerms {
                fee: Some(LoanFee { amount, mode: FeeMode::Upfront }),
                ..
            }) if *amount > 0.0 => Some(*amount),
            _ => None,
        }
    }

    /// Fee amount added to every payment, if any
    pub fn monthly_fee(&self) -> Option<f64> {
        match self {
            DebtKind::Installment(InstallmentTerms {
                fee: Some(LoanFee { amount, mode: FeeMode::Monthly }),
                ..
            }) if *amount > 0.0 => Some(*amount),
            _ => None,
        }
    }
}

/// A single owed obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    /// Unique identifier, immutable after creation
    pub id: DebtId,

    /// Creditor label shown to the user
    pub creditor_name: String,

    /// Revolving or installment, with installment terms
    pub kind: DebtKind,

    /// Outstanding balance
    pub balance: f64,

    /// Explicit minimum payment (None = derive)
    #[serde(default)]
    pub minimum_payment: Option<f64>,

    /// Annual percentage rate (e.g. 24.99 for 24.99%)
    pub interest_rate: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DebtRecord {
    /// Create a new record with a fresh identifier
    pub fn new(
        creditor_name: impl Into<String>,
        kind: DebtKind,
        balance: f64,
        minimum_payment: Option<f64>,
        interest_rate: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DebtId::new(),
            creditor_name: creditor_name.into(),
            kind,
            balance,
            minimum_payment,
            interest_rate,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a revolving (credit card) debt
    pub fn revolving(
        creditor_name: impl Into<String>,
        balance: f64,
        minimum_payment: Option<f64>,
        interest_rate: f64,
    ) -> Self {
        Self::new(creditor_name, DebtKind::Revolving, balance, minimum_payment, interest_rate, Utc::now())
    }

    /// Create an installment loan
    pub fn installment(
        creditor_name: impl Into<String>,
        balance: f64,
        interest_rate: f64,
        terms: InstallmentTerms,
    ) -> Self {
        Self::new(creditor_name, DebtKind::Installment(terms), balance, None, interest_rate, Utc::now())
    }

    /// Explicit minimum payment, treating non-positive values as unset
    pub fn explicit_minimum(&self) -> Option<f64> {
        self.minimum_payment.filter(|m| *m > 0.0)
    }

    /// Produce a replacement snapshot with the update applied
    pub fn with_update(&self, update: &DebtUpdate, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            creditor_name: update.creditor_name.clone().unwrap_or_else(|| self.creditor_name.clone()),
            kind: update.kind.unwrap_or(self.kind),
            balance: update.balance.unwrap_or(self.balance),
            minimum_payment: update.minimum_payment.unwrap_or(self.minimum_payment),
            interest_rate: update.interest_rate.unwrap_or(self.interest_rate),
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

/// Partial replacement of a debt's fields
///
/// `minimum_payment: Some(None)` clears an explicit minimum so it is derived again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtUpdate {
    pub creditor_name: Option<String>,
    pub kind: Option<DebtKind>,
    pub balance: Option<f64>,
    pub minimum_payment: Option<Option<f64>>,
    pub interest_rate: Option<f64>,
}

/// User's monthly budget and display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Funds available each month for debt repayment
    pub available_funds: f64,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Percentage of balance used as minimum payment when none can be derived (1-10)
    #[serde(default = "default_min_payment_percent")]
    pub default_min_percent: f64,

    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(available_funds: f64) -> Self {
        Self {
            available_funds,
            currency: default_currency(),
            default_min_percent: DEFAULT_MIN_PAYMENT_PERCENT,
            last_updated: Utc::now(),
        }
    }

    /// Default minimum percentage, falling back to 2% when unset or zero
    pub fn effective_min_percent(&self) -> f64 {
        if self.default_min_percent.is_finite() && self.default_min_percent > 0.0 {
            self.default_min_percent
        } else {
            DEFAULT_MIN_PAYMENT_PERCENT
        }
    }
}
