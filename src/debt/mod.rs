//! Debt records, validation, loading and storage

mod data;
mod validation;
pub mod loader;
pub mod store;

pub use data::{
    DebtId, DebtRecord, DebtKind, DebtCategory, InstallmentTerms, LoanFee, FeeMode,
    DebtUpdate, UserProfile, DEFAULT_CURRENCY, DEFAULT_MIN_PAYMENT_PERCENT,
};
pub use validation::{
    DebtDraft, ValidationLimits, validate, validate_with_limits, check_record, check_records,
};
pub use loader::{load_drafts_csv, load_drafts_from_reader, load_records_json};
pub use store::{DebtStore, JsonFileStore, MemoryStore, StoreSnapshot};
